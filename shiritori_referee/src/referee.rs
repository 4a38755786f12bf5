// The referee: startup plus per-event handling.
//
// `Referee::initialize` is the only constructor. It loads the lexicon,
// builds the word index, validates the rules and asks the transport who the
// bot is; if any step fails there is no `Referee`, so nothing can be served
// against a half-built index.
//
// `handle_event` runs one inbound chat message through the rules:
// 1. Drop the bot's own messages (no reply).
// 2. Lock the room and run `RoomGame::advance`, reading the word through
//    the analyzer only if a game is in progress.
// 3. Render the outcome and hand it to the transport while still holding
//    the room lock, so replies in one room go out in the order their
//    events came in.
//
// Delivery and analyzer failures are logged and otherwise ignored: the
// room's state change stands, and an unreadable message counts as "no
// eligible word".

use std::time::{SystemTime, UNIX_EPOCH};

use shiritori_lang::{
    Lexicon, LexiconAnalyzer, TextAnalyzer, WordIndex, default_lexicon, first_playable_reading,
};
use shiritori_protocol::{AccountId, InboundEvent, OutboundMessage};
use tracing::{debug, info, warn};

use crate::config::{LexiconSource, RefereeConfig};
use crate::error::StartupError;
use crate::messages;
use crate::registry::RoomRegistry;
use crate::room::Rules;
use crate::transport::ChatTransport;

pub struct Referee {
    index: WordIndex,
    rules: Rules,
    rooms: RoomRegistry,
    analyzer: Box<dyn TextAnalyzer>,
    transport: Box<dyn ChatTransport>,
    bot_account: AccountId,
}

impl Referee {
    /// Build everything needed to serve events. `analyzer` defaults to a
    /// `LexiconAnalyzer` over the configured lexicon.
    pub fn initialize(
        config: &RefereeConfig,
        transport: Box<dyn ChatTransport>,
        analyzer: Option<Box<dyn TextAnalyzer>>,
    ) -> Result<Self, StartupError> {
        let lexicon = match &config.lexicon {
            LexiconSource::Embedded => default_lexicon(),
            LexiconSource::File(path) => Lexicon::from_path(path)?,
        };

        let index = WordIndex::build(lexicon.all());
        if index.is_empty() {
            return Err(StartupError::EmptyIndex);
        }
        info!(
            entries = lexicon.all().len(),
            words = index.len(),
            buckets = index.bucket_count(),
            "word index built"
        );

        let rules = Rules::new(
            &config.start_trigger,
            &config.bootstrap_word,
            config.terminal_policy,
        )?;

        let bot_account = transport
            .bot_account_id()
            .map_err(StartupError::Identity)?;
        info!(account = %bot_account, "bot identity resolved");

        let analyzer = analyzer
            .unwrap_or_else(|| Box::new(LexiconAnalyzer::new(&lexicon)) as Box<dyn TextAnalyzer>);
        let seed = config.seed.unwrap_or_else(clock_seed);
        info!(seed, policy = ?rules.terminal_policy(), "referee ready");

        Ok(Self {
            index,
            rules,
            rooms: RoomRegistry::new(seed),
            analyzer,
            transport,
            bot_account,
        })
    }

    /// Process one chat message. Returns the reply that was sent, or `None`
    /// for the bot's own messages.
    pub fn handle_event(&self, event: &InboundEvent) -> Option<OutboundMessage> {
        if event.account_id == self.bot_account {
            debug!(room = %event.room_id, "skipping own message");
            return None;
        }

        let message = self.rooms.with_room(&event.room_id, |room| {
            let outcome = room.advance(&event.body, &self.rules, &self.index, |body| {
                self.read_word(body)
            });
            info!(
                room = %event.room_id,
                account = %event.account_id,
                outcome = outcome.label(),
                game_over = outcome.is_game_over(),
                "turn processed"
            );

            let message = OutboundMessage {
                room_id: event.room_id.clone(),
                text: messages::render(&outcome, &self.rules),
            };
            if let Err(e) = self.transport.send(&message) {
                warn!(room = %event.room_id, error = %e, "reply delivery failed");
            }
            message
        });
        Some(message)
    }

    fn read_word(&self, body: &str) -> String {
        match self.analyzer.analyze(body) {
            Ok(tokens) => first_playable_reading(&tokens),
            Err(e) => {
                warn!(error = %e, "analyzer failed; treating message as unrecognized");
                String::new()
            }
        }
    }

    pub fn bot_account(&self) -> &AccountId {
        &self.bot_account
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn room_count(&self) -> usize {
        self.rooms.room_count()
    }

    /// Number of playable words in the index.
    pub fn word_count(&self) -> usize {
        self.index.len()
    }
}

/// Base seed when none is configured.
fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}
