// shiritori_referee — plays shiritori against chat rooms over a webhook.
//
// The chat platform POSTs every room message to the webhook; the referee
// runs it through that room's game and answers with one reply (also pushed
// to the platform through a `ChatTransport`). Word knowledge lives in
// `shiritori_lang`; wire types in `shiritori_protocol`.
//
// Module overview:
// - `room.rs`:      `RoomGame` state machine and the ordered rule checks,
//                   `Rules`, `TerminalPolicy`, `Outcome`.
// - `registry.rs`:  `RoomRegistry` — per-room locks in a sharded map.
// - `messages.rs`:  Outcome → reply text.
// - `referee.rs`:   `Referee` — startup (`initialize`) and per-event
//                   handling (`handle_event`).
// - `transport.rs`: `ChatTransport` seam, HTTP and dry-run transports.
// - `analyzer.rs`:  `HttpAnalyzer`, an external morphological analyzer.
// - `server.rs`:    `tiny_http` webhook server with a worker pool.
// - `config.rs`:    `RefereeConfig`.
// - `error.rs`:     `StartupError`.
//
// The referee runs as a standalone binary (`main.rs`) or embedded via the
// library API (`Referee::initialize` + `start_server`).

pub mod analyzer;
pub mod config;
pub mod error;
pub mod messages;
pub mod referee;
pub mod registry;
pub mod room;
pub mod server;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use config::{LexiconSource, RefereeConfig};
pub use error::StartupError;
pub use referee::Referee;
pub use room::{Outcome, TerminalPolicy};
pub use server::{ServerHandle, start_server};
