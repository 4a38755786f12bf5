// shiritori_protocol — wire types for the shiritori referee's collaborators.
//
// The referee talks JSON over HTTP to two outside parties: the chat
// platform (webhook in, post-message out, bot identity lookup) and an
// optional morphological analyzer. This crate pins down those payloads so
// the referee, its tests, and any stub services agree on one shape. It has
// no dependency on the game logic.
//
// Module overview:
// - `types.rs`:   `RoomId`, `AccountId` — string-backed, accept numeric JSON.
// - `message.rs`: `InboundEvent`, `OutboundMessage`, `WebhookAck`,
//                 `BotIdentity`, `HealthStatus`, analyzer request/response.
//
// Design decisions:
// - **JSON only.** Both collaborators are HTTP services; no framing layer.
// - **Opaque identifiers.** The referee never parses room or account ids,
//   only compares them, so they stay strings even when the platform sends
//   numbers.

pub mod message;
pub mod types;

pub use message::{
    AnalyzeRequest, AnalyzeResponse, AnalyzedToken, BotIdentity, HealthStatus, InboundEvent,
    OutboundMessage, PostMessageBody, WebhookAck,
};
pub use types::{AccountId, RoomId};
