// Chat platform transport.
//
// `ChatTransport` is the seam between the referee and the chat service: it
// reports the bot's own account (used to ignore the bot's own messages) and
// delivers one outbound message. Delivery is best-effort; the referee logs
// failures and never rolls back a room's state because of one.
//
// - `HttpTransport`: talks to a REST-style chat API with `ureq`.
//   `GET {base}/me` returns `{"account_id": ...}`;
//   `POST {base}/rooms/{room_id}/messages` takes `{"body": "..."}`; the
//   room id is percent-encoded as a single path segment.
//   The optional API token goes in `X-Api-Token`.
// - `LogTransport`: dry run. Logs each message and sends nothing; the bot
//   account comes from configuration.

use std::time::Duration;

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use shiritori_protocol::{AccountId, BotIdentity, OutboundMessage, PostMessageBody};
use tracing::info;

/// Header carrying the chat API token.
pub const API_TOKEN_HEADER: &str = "X-Api-Token";

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },
    #[error("malformed response from {url}: {reason}")]
    Malformed { url: String, reason: String },
    #[error("no bot account id configured")]
    MissingIdentity,
}

/// Outbound side of the chat platform.
pub trait ChatTransport: Send + Sync {
    /// The account the bot posts as.
    fn bot_account_id(&self) -> Result<AccountId, TransportError>;

    /// Deliver one message to its room.
    fn send(&self, message: &OutboundMessage) -> Result<(), TransportError>;
}

/// REST chat API client.
pub struct HttpTransport {
    agent: ureq::Agent,
    api_base: String,
    token: Option<String>,
}

impl HttpTransport {
    pub fn new(api_base: &str, token: Option<String>, timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            api_base: api_base.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn authorized(&self, request: ureq::Request) -> ureq::Request {
        match &self.token {
            Some(token) => request.set(API_TOKEN_HEADER, token),
            None => request,
        }
    }
}

impl ChatTransport for HttpTransport {
    fn bot_account_id(&self) -> Result<AccountId, TransportError> {
        let url = format!("{}/me", self.api_base);
        let response = self
            .authorized(self.agent.get(&url))
            .call()
            .map_err(|e| TransportError::Request {
                url: url.clone(),
                reason: e.to_string(),
            })?;
        let identity: BotIdentity = response
            .into_json()
            .map_err(|e| TransportError::Malformed {
                url,
                reason: e.to_string(),
            })?;
        Ok(identity.account_id)
    }

    fn send(&self, message: &OutboundMessage) -> Result<(), TransportError> {
        let url = format!(
            "{}/rooms/{}/messages",
            self.api_base,
            utf8_percent_encode(&message.room_id.0, NON_ALPHANUMERIC)
        );
        self.authorized(self.agent.post(&url))
            .send_json(PostMessageBody {
                body: message.text.clone(),
            })
            .map_err(|e| TransportError::Request {
                url,
                reason: e.to_string(),
            })?;
        Ok(())
    }
}

/// Dry-run transport: logs instead of posting.
pub struct LogTransport {
    bot_account: Option<AccountId>,
}

impl LogTransport {
    pub fn new(bot_account: Option<AccountId>) -> Self {
        Self { bot_account }
    }
}

impl ChatTransport for LogTransport {
    fn bot_account_id(&self) -> Result<AccountId, TransportError> {
        self.bot_account
            .clone()
            .ok_or(TransportError::MissingIdentity)
    }

    fn send(&self, message: &OutboundMessage) -> Result<(), TransportError> {
        info!(room = %message.room_id, text = %message.text, "reply (dry run)");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use shiritori_protocol::RoomId;

    use super::*;
    use crate::test_support::serve_once;

    #[test]
    fn log_transport_identity() {
        let transport = LogTransport::new(Some(AccountId("bot".into())));
        assert_eq!(transport.bot_account_id().unwrap(), AccountId("bot".into()));
        assert!(matches!(
            LogTransport::new(None).bot_account_id(),
            Err(TransportError::MissingIdentity)
        ));
    }

    #[test]
    fn log_transport_send_succeeds() {
        let transport = LogTransport::new(None);
        let message = OutboundMessage {
            room_id: RoomId("r".into()),
            text: "hi".into(),
        };
        assert!(transport.send(&message).is_ok());
    }

    #[test]
    fn http_transport_fetches_identity() {
        let (addr, captured) = serve_once(200, r#"{"account_id": 777}"#);
        let transport = HttpTransport::new(
            &format!("http://{addr}/"),
            Some("secret".into()),
            Duration::from_secs(5),
        );
        assert_eq!(transport.bot_account_id().unwrap(), AccountId("777".into()));

        let request = captured.join().unwrap();
        assert_eq!(request.method, "GET");
        assert_eq!(request.path, "/me");
        assert_eq!(request.header(API_TOKEN_HEADER), Some("secret"));
    }

    #[test]
    fn http_transport_posts_message() {
        let (addr, captured) = serve_once(200, "{}");
        let transport =
            HttpTransport::new(&format!("http://{addr}"), None, Duration::from_secs(5));
        let message = OutboundMessage {
            room_id: RoomId("42".into()),
            text: "「ゴマ」".into(),
        };
        transport.send(&message).unwrap();

        let request = captured.join().unwrap();
        assert_eq!(request.method, "POST");
        assert_eq!(request.path, "/rooms/42/messages");
        assert_eq!(request.header(API_TOKEN_HEADER), None);
        let body: PostMessageBody = serde_json::from_str(&request.body).unwrap();
        assert_eq!(body.body, "「ゴマ」");
    }

    #[test]
    fn http_transport_escapes_room_id() {
        let (addr, captured) = serve_once(200, "{}");
        let transport =
            HttpTransport::new(&format!("http://{addr}"), None, Duration::from_secs(5));
        let message = OutboundMessage {
            room_id: RoomId("team/42?x=1".into()),
            text: "x".into(),
        };
        transport.send(&message).unwrap();

        let request = captured.join().unwrap();
        assert_eq!(request.path, "/rooms/team%2F42%3Fx%3D1/messages");
    }

    #[test]
    fn http_transport_reports_server_error() {
        let (addr, captured) = serve_once(500, "boom");
        let transport =
            HttpTransport::new(&format!("http://{addr}"), None, Duration::from_secs(5));
        let message = OutboundMessage {
            room_id: RoomId("1".into()),
            text: "x".into(),
        };
        assert!(matches!(
            transport.send(&message),
            Err(TransportError::Request { .. })
        ));
        captured.join().unwrap();
    }

    #[test]
    fn http_transport_rejects_malformed_identity() {
        let (addr, captured) = serve_once(200, "not json");
        let transport =
            HttpTransport::new(&format!("http://{addr}"), None, Duration::from_secs(5));
        assert!(matches!(
            transport.bot_account_id(),
            Err(TransportError::Malformed { .. })
        ));
        captured.join().unwrap();
    }
}
