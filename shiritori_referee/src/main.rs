// CLI entry point for the shiritori referee.
//
// Loads the lexicon, resolves the bot identity, then serves the webhook
// until the process is killed. Every option can also come from a
// `SHIRITORI_*` environment variable. Without `--chat-api-base` the
// referee runs dry: replies are logged, not posted, and `--bot-account-id`
// supplies the identity.
//
// Logging goes through `tracing`; set `RUST_LOG` to override the default
// `info` level.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use shiritori_lang::TextAnalyzer;
use shiritori_protocol::AccountId;
use shiritori_referee::analyzer::HttpAnalyzer;
use shiritori_referee::config::{DEFAULT_BOOTSTRAP_WORD, DEFAULT_START_TRIGGER};
use shiritori_referee::transport::{ChatTransport, HttpTransport, LogTransport};
use shiritori_referee::{
    LexiconSource, Referee, RefereeConfig, StartupError, TerminalPolicy, start_server,
};
use tracing::{error, info};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyArg {
    /// A word ending in ん loses the game.
    Lose,
    /// A word ending in ん is refused; the player tries again.
    Reject,
}

impl From<PolicyArg> for TerminalPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Lose => TerminalPolicy::Lose,
            PolicyArg::Reject => TerminalPolicy::Reject,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "shiritori-referee", version, about = "Shiritori webhook referee")]
struct Args {
    /// Address to bind.
    #[arg(long, env = "SHIRITORI_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on.
    #[arg(long, env = "SHIRITORI_PORT", default_value_t = 8080)]
    port: u16,

    /// Webhook worker threads.
    #[arg(long, env = "SHIRITORI_WORKERS", default_value_t = 4)]
    workers: usize,

    /// Shared secret required in the X-Shiritori-Token header.
    #[arg(long, env = "SHIRITORI_WEBHOOK_TOKEN")]
    webhook_token: Option<String>,

    /// JSON lexicon file (default: built-in word list).
    #[arg(long, env = "SHIRITORI_LEXICON")]
    lexicon: Option<PathBuf>,

    /// Phrase that starts (or restarts) a game.
    #[arg(long, env = "SHIRITORI_START_TRIGGER", default_value = DEFAULT_START_TRIGGER)]
    start_trigger: String,

    /// Word every game starts from.
    #[arg(long, env = "SHIRITORI_BOOTSTRAP_WORD", default_value = DEFAULT_BOOTSTRAP_WORD)]
    bootstrap_word: String,

    /// What happens to a word ending in ん.
    #[arg(long, env = "SHIRITORI_TERMINAL_POLICY", value_enum, default_value = "lose")]
    terminal_policy: PolicyArg,

    /// Base seed for the engine's word choice (default: from the clock).
    #[arg(long, env = "SHIRITORI_SEED")]
    seed: Option<u64>,

    /// External analyzer endpoint (default: built-in lexicon matcher).
    #[arg(long, env = "SHIRITORI_ANALYZER_URL")]
    analyzer_url: Option<String>,

    /// Chat platform API root. Omit for a dry run.
    #[arg(long, env = "SHIRITORI_CHAT_API_BASE")]
    chat_api_base: Option<String>,

    /// Chat platform API token.
    #[arg(long, env = "SHIRITORI_CHAT_API_TOKEN")]
    chat_api_token: Option<String>,

    /// Bot account id for a dry run.
    #[arg(long, env = "SHIRITORI_BOT_ACCOUNT_ID")]
    bot_account_id: Option<String>,

    /// Timeout in seconds for outbound HTTP calls.
    #[arg(long, env = "SHIRITORI_HTTP_TIMEOUT", default_value_t = 5)]
    http_timeout: u64,
}

impl Args {
    fn into_config(self) -> RefereeConfig {
        RefereeConfig {
            host: self.host,
            port: self.port,
            workers: self.workers,
            webhook_token: self.webhook_token,
            lexicon: self
                .lexicon
                .map_or(LexiconSource::Embedded, LexiconSource::File),
            start_trigger: self.start_trigger,
            bootstrap_word: self.bootstrap_word,
            terminal_policy: self.terminal_policy.into(),
            seed: self.seed,
            analyzer_url: self.analyzer_url,
            chat_api_base: self.chat_api_base,
            chat_api_token: self.chat_api_token,
            bot_account_id: self.bot_account_id,
            http_timeout: Duration::from_secs(self.http_timeout),
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = Args::parse().into_config();
    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "referee failed to start");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &RefereeConfig) -> Result<(), StartupError> {
    let transport: Box<dyn ChatTransport> = match &config.chat_api_base {
        Some(base) => Box::new(HttpTransport::new(
            base,
            config.chat_api_token.clone(),
            config.http_timeout,
        )),
        None => {
            info!("no chat API configured; replies will only be logged");
            Box::new(LogTransport::new(
                config.bot_account_id.clone().map(AccountId),
            ))
        }
    };

    let analyzer = config.analyzer_url.as_deref().map(|url| {
        info!(url, "using external analyzer");
        Box::new(HttpAnalyzer::new(url, config.http_timeout)) as Box<dyn TextAnalyzer>
    });

    let referee = Arc::new(Referee::initialize(config, transport, analyzer)?);
    let (handle, addr) = start_server(config, referee).map_err(StartupError::Bind)?;
    info!(%addr, workers = config.workers, "webhook server listening");

    handle.wait();
    Ok(())
}
