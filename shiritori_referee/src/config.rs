// Referee configuration.
//
// `RefereeConfig` is a plain struct with a `Default` impl; library callers
// and tests fill in only what they care about. The binary (`main.rs`) maps
// its command-line/env arguments onto it. Nothing here touches the network
// or the filesystem; `Referee::initialize` does the loading.

use std::path::PathBuf;
use std::time::Duration;

use crate::room::TerminalPolicy;

/// Default start trigger phrase.
pub const DEFAULT_START_TRIGGER: &str = "しりとり開始";

/// Default bootstrap word.
pub const DEFAULT_BOOTSTRAP_WORD: &str = "しりとり";

/// Where the lexicon comes from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LexiconSource {
    /// The word list compiled into the binary.
    #[default]
    Embedded,
    /// A JSON lexicon file on disk.
    File(PathBuf),
}

/// Configuration for the referee and its webhook server.
#[derive(Clone, Debug)]
pub struct RefereeConfig {
    pub host: String,
    pub port: u16,
    /// Worker threads serving webhook requests.
    pub workers: usize,
    /// Shared secret expected in `X-Shiritori-Token`, if set.
    pub webhook_token: Option<String>,
    pub lexicon: LexiconSource,
    pub start_trigger: String,
    pub bootstrap_word: String,
    pub terminal_policy: TerminalPolicy,
    /// Base seed for per-room move selection. `None` derives one from the
    /// clock at startup.
    pub seed: Option<u64>,
    /// External analyzer endpoint. `None` uses the lexicon analyzer.
    pub analyzer_url: Option<String>,
    /// Chat platform API root. `None` runs in dry-run mode (log only).
    pub chat_api_base: Option<String>,
    pub chat_api_token: Option<String>,
    /// Bot account for dry-run mode.
    pub bot_account_id: Option<String>,
    /// Timeout for every outbound HTTP call.
    pub http_timeout: Duration,
}

impl Default for RefereeConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
            workers: 4,
            webhook_token: None,
            lexicon: LexiconSource::Embedded,
            start_trigger: DEFAULT_START_TRIGGER.into(),
            bootstrap_word: DEFAULT_BOOTSTRAP_WORD.into(),
            terminal_policy: TerminalPolicy::Lose,
            seed: None,
            analyzer_url: None,
            chat_api_base: None,
            chat_api_token: None,
            bot_account_id: None,
            http_timeout: Duration::from_secs(5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RefereeConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.workers, 4);
        assert_eq!(config.lexicon, LexiconSource::Embedded);
        assert_eq!(config.start_trigger, "しりとり開始");
        assert_eq!(config.bootstrap_word, "しりとり");
        assert_eq!(config.terminal_policy, TerminalPolicy::Lose);
        assert!(config.webhook_token.is_none());
        assert!(config.seed.is_none());
    }
}
