// Messages exchanged with the referee's collaborators.
//
// Three directions:
// - Chat platform → referee: `InboundEvent`, posted to the webhook; the
//   referee answers the HTTP request with `WebhookAck`.
// - Referee → chat platform: `OutboundMessage` (addressed to a room), sent
//   as `PostMessageBody`; `BotIdentity` is fetched once at startup.
// - Referee → text analyzer: `AnalyzeRequest` / `AnalyzeResponse`.
//
// All types derive `Serialize`/`Deserialize` for JSON. Field names are
// snake_case on the wire.

use serde::{Deserialize, Serialize};

use crate::types::{AccountId, RoomId};

/// One chat message delivered to the webhook.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEvent {
    pub room_id: RoomId,
    /// Author of the message; may be the bot itself.
    pub account_id: AccountId,
    pub body: String,
}

/// Reply text addressed to a room.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub room_id: RoomId,
    pub text: String,
}

/// HTTP response body for a handled webhook call. `reply` is `None` when
/// the event was the bot's own message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookAck {
    pub reply: Option<String>,
}

/// Body of a post-message call to the chat platform.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMessageBody {
    pub body: String,
}

/// The bot's own account, as reported by the chat platform.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotIdentity {
    pub account_id: AccountId,
}

/// Health endpoint payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub rooms: usize,
    pub words: usize,
}

/// Request to the external text analyzer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
}

/// One token returned by the text analyzer. `reading` may be `"*"` or
/// absent when the analyzer has no reading for the token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzedToken {
    #[serde(default)]
    pub pos: Vec<String>,
    #[serde(default)]
    pub reading: Option<String>,
}

/// Analyzer output, tokens in text order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub tokens: Vec<AnalyzedToken>,
}
