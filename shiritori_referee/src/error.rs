// Startup errors for the referee.
//
// Everything that can go wrong before the first event is served lands here
// and is fatal: the binary logs it and exits non-zero. Per-event problems
// are not errors; rule violations are `room::Outcome` values, and analyzer
// or delivery failures are logged where they happen.

use shiritori_lang::LexiconError;

use crate::room::RulesError;
use crate::transport::TransportError;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Lexicon(#[from] LexiconError),
    #[error("word index is empty after filtering the lexicon")]
    EmptyIndex,
    #[error("invalid rules: {0}")]
    Rules(#[from] RulesError),
    #[error("cannot determine bot account: {0}")]
    Identity(#[source] TransportError),
    #[error("cannot start webhook server: {0}")]
    Bind(#[source] std::io::Error),
}
