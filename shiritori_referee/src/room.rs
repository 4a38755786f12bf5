// Per-room game state machine and rule engine.
//
// `RoomGame` is the state of one chat room: either no game, or a game in
// progress with the current chain tail, the character the next word must
// start with, and every reading played so far by either side. All mutation
// goes through `advance`, which the referee calls with the room's lock held
// (see `registry.rs`), so there is no internal locking here.
//
// `advance` evaluates one submission against the rules in a fixed order:
// 1. the message contains the start trigger   → StartAck, fresh game
// 2. no game in progress                      → WaitingForStart
// 3. no eligible word could be read            → RejectedUnrecognized
// 4. the reading was already played            → RejectedReused
// 5. the reading ends in the terminal sound    → HumanLoses (game over), or
//                                                RejectedTerminalSound under
//                                                `TerminalPolicy::Reject`
// 6. the reading does not start with the required character
//                                              → RejectedLeadMismatch
// 7. accept, then ask the move selector for a reply:
//    none available                            → EngineLoses (game over)
//    found                                     → TurnAccepted
//
// Skipping the bot's own messages happens one level up in `Referee`, since
// it depends on the event's author rather than the room.
//
// The word reader is passed in as a closure and only invoked once steps 1-2
// have passed, so rooms without a game never touch the external analyzer.
// Each room owns its own `GameRng`; nothing here is shared between rooms
// except the read-only `WordIndex`.

use std::collections::BTreeSet;

use shiritori_lang::index::MIN_READING_LEN;
use shiritori_lang::{WordIndex, kana, select_move};
use shiritori_prng::GameRng;

/// What happens when a player's word ends in the terminal sound.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TerminalPolicy {
    /// The player loses and the game ends.
    #[default]
    Lose,
    /// The word is refused and the player may try again.
    Reject,
}

/// Invalid rule configuration. Fatal at startup.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum RulesError {
    #[error("start trigger must not be empty")]
    EmptyTrigger,
    #[error("bootstrap word {0:?} is not a playable reading")]
    InvalidBootstrap(String),
}

/// Game rules shared by every room.
#[derive(Clone, Debug)]
pub struct Rules {
    start_trigger: String,
    bootstrap_word: String,
    bootstrap_next: char,
    terminal_policy: TerminalPolicy,
}

impl Rules {
    /// Validate and build the rules. The bootstrap word is normalized and
    /// must be a reading the engine itself could have played.
    pub fn new(
        start_trigger: &str,
        bootstrap_word: &str,
        terminal_policy: TerminalPolicy,
    ) -> Result<Self, RulesError> {
        if start_trigger.is_empty() {
            return Err(RulesError::EmptyTrigger);
        }
        let bootstrap = kana::to_canonical(bootstrap_word);
        if !shiritori_lang::index::is_indexable(&bootstrap) {
            return Err(RulesError::InvalidBootstrap(bootstrap_word.to_string()));
        }
        let bootstrap_next = kana::last_effective_char(&bootstrap)
            .ok_or_else(|| RulesError::InvalidBootstrap(bootstrap_word.to_string()))?;
        Ok(Rules {
            start_trigger: start_trigger.to_string(),
            bootstrap_word: bootstrap,
            bootstrap_next,
            terminal_policy,
        })
    }

    pub fn start_trigger(&self) -> &str {
        &self.start_trigger
    }

    pub fn bootstrap_word(&self) -> &str {
        &self.bootstrap_word
    }

    pub fn terminal_policy(&self) -> TerminalPolicy {
        self.terminal_policy
    }
}

/// State of one room.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoomState {
    NoGame,
    InProgress {
        /// Reading of the most recently placed word.
        chain_tail: String,
        /// Last effective character of `chain_tail`.
        required: char,
        /// Readings placed by either side this game.
        used: BTreeSet<String>,
    },
}

/// Result of one submission. Exactly one outbound message per outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    StartAck {
        bootstrap: String,
        next: char,
    },
    WaitingForStart,
    RejectedUnrecognized,
    RejectedReused {
        reading: String,
    },
    RejectedTerminalSound {
        reading: String,
    },
    RejectedLeadMismatch {
        reading: String,
        required: char,
    },
    HumanLoses {
        reading: String,
    },
    EngineLoses {
        reading: String,
        required: char,
    },
    TurnAccepted {
        reading: String,
        reply: String,
        next: char,
    },
}

impl Outcome {
    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::StartAck { .. } => "start_ack",
            Outcome::WaitingForStart => "waiting_for_start",
            Outcome::RejectedUnrecognized => "rejected_unrecognized",
            Outcome::RejectedReused { .. } => "rejected_reused",
            Outcome::RejectedTerminalSound { .. } => "rejected_terminal_sound",
            Outcome::RejectedLeadMismatch { .. } => "rejected_lead_mismatch",
            Outcome::HumanLoses { .. } => "human_loses",
            Outcome::EngineLoses { .. } => "engine_loses",
            Outcome::TurnAccepted { .. } => "turn_accepted",
        }
    }

    /// Whether this outcome ended the game.
    pub fn is_game_over(&self) -> bool {
        matches!(self, Outcome::HumanLoses { .. } | Outcome::EngineLoses { .. })
    }
}

/// One room's game.
#[derive(Clone, Debug)]
pub struct RoomGame {
    state: RoomState,
    rng: GameRng,
}

impl RoomGame {
    /// A room with no game, drawing engine moves from `rng`.
    pub fn new(rng: GameRng) -> Self {
        Self {
            state: RoomState::NoGame,
            rng,
        }
    }

    pub fn state(&self) -> &RoomState {
        &self.state
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(self.state, RoomState::InProgress { .. })
    }

    /// Reading of the last placed word, if a game is running.
    pub fn chain_tail(&self) -> Option<&str> {
        match &self.state {
            RoomState::InProgress { chain_tail, .. } => Some(chain_tail),
            RoomState::NoGame => None,
        }
    }

    /// Readings used so far, if a game is running.
    pub fn used_words(&self) -> Option<&BTreeSet<String>> {
        match &self.state {
            RoomState::InProgress { used, .. } => Some(used),
            RoomState::NoGame => None,
        }
    }

    /// Start (or restart) a game from the bootstrap word.
    pub fn start(&mut self, rules: &Rules) -> Outcome {
        self.state = RoomState::InProgress {
            chain_tail: rules.bootstrap_word.clone(),
            required: rules.bootstrap_next,
            used: BTreeSet::new(),
        };
        Outcome::StartAck {
            bootstrap: rules.bootstrap_word.clone(),
            next: rules.bootstrap_next,
        }
    }

    /// Process one submission. `read_word` maps the message body to its
    /// canonical reading (`""` if no eligible word).
    pub fn advance<F>(&mut self, body: &str, rules: &Rules, index: &WordIndex, read_word: F) -> Outcome
    where
        F: FnOnce(&str) -> String,
    {
        if body.contains(&rules.start_trigger) {
            return self.start(rules);
        }

        let RoomState::InProgress {
            chain_tail,
            required,
            used,
        } = &mut self.state
        else {
            return Outcome::WaitingForStart;
        };

        let reading = read_word(body);
        if reading.chars().count() < MIN_READING_LEN {
            return Outcome::RejectedUnrecognized;
        }

        if used.contains(&reading) {
            return Outcome::RejectedReused { reading };
        }

        if kana::ends_in_terminal_sound(&reading) {
            return match rules.terminal_policy {
                TerminalPolicy::Reject => Outcome::RejectedTerminalSound { reading },
                TerminalPolicy::Lose => {
                    self.state = RoomState::NoGame;
                    Outcome::HumanLoses { reading }
                }
            };
        }

        if kana::lead_char(&reading) != Some(*required) {
            return Outcome::RejectedLeadMismatch {
                reading,
                required: *required,
            };
        }

        used.insert(reading.clone());
        let Some(next_lead) = kana::last_effective_char(&reading) else {
            return Outcome::RejectedUnrecognized;
        };

        let reply = select_move(index, next_lead, used, &mut self.rng);
        match reply.and_then(|r| kana::last_effective_char(&r).map(|next| (r, next))) {
            None => {
                self.state = RoomState::NoGame;
                Outcome::EngineLoses {
                    reading,
                    required: next_lead,
                }
            }
            Some((reply, next)) => {
                used.insert(reply.clone());
                *chain_tail = reply.clone();
                *required = next;
                Outcome::TurnAccepted {
                    reading,
                    reply,
                    next,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use shiritori_lang::LexEntry;

    use super::*;

    const TRIGGER: &str = "しりとり開始";

    fn index_of(readings: &[&str]) -> WordIndex {
        let entries: Vec<LexEntry> = readings
            .iter()
            .map(|r| LexEntry {
                surface: r.to_string(),
                reading: Some(r.to_string()),
                pos: vec!["名詞".into()],
            })
            .collect();
        WordIndex::build(&entries)
    }

    fn rules(bootstrap: &str) -> Rules {
        Rules::new(TRIGGER, bootstrap, TerminalPolicy::Lose).unwrap()
    }

    /// Reader that treats the whole body as the word.
    fn verbatim(body: &str) -> String {
        kana::to_canonical(body.trim())
    }

    fn started(rules: &Rules) -> RoomGame {
        let mut room = RoomGame::new(GameRng::new(42));
        room.start(rules);
        room
    }

    #[test]
    fn rules_reject_bad_bootstrap() {
        assert_eq!(
            Rules::new(TRIGGER, "みかん", TerminalPolicy::Lose).unwrap_err(),
            RulesError::InvalidBootstrap("みかん".into())
        );
        assert!(Rules::new(TRIGGER, "き", TerminalPolicy::Lose).is_err());
        assert_eq!(
            Rules::new("", "しりとり", TerminalPolicy::Lose).unwrap_err(),
            RulesError::EmptyTrigger
        );
    }

    #[test]
    fn rules_normalize_bootstrap() {
        let rules = rules("シリトリ");
        assert_eq!(rules.bootstrap_word(), "しりとり");
    }

    // Scenario A
    #[test]
    fn no_game_waits_for_start() {
        let rules = rules("しりとり");
        let index = index_of(&["りす"]);
        let mut room = RoomGame::new(GameRng::new(1));
        let mut analyzed = false;
        let outcome = room.advance("hello", &rules, &index, |b| {
            analyzed = true;
            verbatim(b)
        });
        assert_eq!(outcome, Outcome::WaitingForStart);
        assert_eq!(room.state(), &RoomState::NoGame);
        assert!(!analyzed, "reader must not run without a game");
    }

    // Scenario B
    #[test]
    fn start_trigger_starts_game() {
        let rules = rules("しりとり");
        let index = index_of(&["りす"]);
        let mut room = RoomGame::new(GameRng::new(1));
        let outcome = room.advance("さあ しりとり開始！", &rules, &index, verbatim);
        assert_eq!(
            outcome,
            Outcome::StartAck {
                bootstrap: "しりとり".into(),
                next: 'り'
            }
        );
        assert_eq!(room.chain_tail(), Some("しりとり"));
        assert!(room.used_words().unwrap().is_empty());
    }

    #[test]
    fn start_trigger_resets_running_game() {
        let rules = rules("りんご");
        let index = index_of(&["まくら", "まつり"]);
        let mut room = started(&rules);
        room.advance("ごま", &rules, &index, verbatim);
        assert!(!room.used_words().unwrap().is_empty());

        let outcome = room.advance(TRIGGER, &rules, &index, verbatim);
        assert!(matches!(outcome, Outcome::StartAck { .. }));
        assert_eq!(room.chain_tail(), Some("りんご"));
        assert!(room.used_words().unwrap().is_empty());
    }

    // Scenario C
    #[test]
    fn accepted_turn_records_both_words() {
        let rules = rules("りんご");
        let index = index_of(&["まくら", "まつり", "めだか"]);
        let mut room = started(&rules);

        let outcome = room.advance("ごま", &rules, &index, verbatim);
        let Outcome::TurnAccepted {
            reading,
            reply,
            next,
        } = outcome
        else {
            panic!("expected TurnAccepted, got {outcome:?}");
        };
        assert_eq!(reading, "ごま");
        assert_eq!(kana::lead_char(&reply), Some('ま'));
        assert_eq!(kana::last_effective_char(&reply), Some(next));

        let used = room.used_words().unwrap();
        assert!(used.contains("ごま"));
        assert!(used.contains(&reply));
        assert_eq!(used.len(), 2);
        assert_eq!(room.chain_tail(), Some(reply.as_str()));
    }

    // Scenario D
    #[test]
    fn reused_word_rejected_without_state_change() {
        let rules = rules("りんご");
        let index = index_of(&["まくら", "まつり", "りす", "らっぱ"]);
        let mut room = started(&rules);
        room.advance("ごま", &rules, &index, verbatim);
        let before = room.state().clone();

        let outcome = room.advance("ごま", &rules, &index, verbatim);
        assert_eq!(
            outcome,
            Outcome::RejectedReused {
                reading: "ごま".into()
            }
        );
        assert_eq!(room.state(), &before);
    }

    // Scenario E
    #[test]
    fn terminal_sound_loses_game() {
        let rules = rules("しりとり");
        let index = index_of(&["まくら"]);
        let mut room = started(&rules);
        let outcome = room.advance("りぼん", &rules, &index, verbatim);
        assert_eq!(
            outcome,
            Outcome::HumanLoses {
                reading: "りぼん".into()
            }
        );
        assert_eq!(room.state(), &RoomState::NoGame);
    }

    #[test]
    fn terminal_sound_checked_before_lead() {
        let rules = rules("しりとり");
        let index = index_of(&["まくら"]);
        let mut room = started(&rules);
        let outcome = room.advance("みかん", &rules, &index, verbatim);
        assert!(matches!(outcome, Outcome::HumanLoses { .. }));
    }

    #[test]
    fn terminal_sound_rejected_under_reject_policy() {
        let rules = Rules::new(TRIGGER, "しりとり", TerminalPolicy::Reject).unwrap();
        let index = index_of(&["まくら"]);
        let mut room = started(&rules);
        let before = room.state().clone();
        let outcome = room.advance("りぼん", &rules, &index, verbatim);
        assert_eq!(
            outcome,
            Outcome::RejectedTerminalSound {
                reading: "りぼん".into()
            }
        );
        assert_eq!(room.state(), &before);
    }

    // Scenario F
    #[test]
    fn engine_loses_when_no_candidate() {
        let rules = rules("りんご");
        let index = index_of(&["ごりら"]);
        let mut room = started(&rules);
        let outcome = room.advance("ごま", &rules, &index, verbatim);
        assert_eq!(
            outcome,
            Outcome::EngineLoses {
                reading: "ごま".into(),
                required: 'ま'
            }
        );
        assert_eq!(room.state(), &RoomState::NoGame);
    }

    #[test]
    fn engine_loses_when_candidates_exhausted() {
        let rules = rules("りんご");
        let index = index_of(&["まり", "りす"]);
        let mut room = started(&rules);
        // ごま → engine must answer まり (only ま word).
        let first = room.advance("ごま", &rules, &index, verbatim);
        assert!(matches!(first, Outcome::TurnAccepted { ref reply, .. } if reply == "まり"));
        // りす → engine needs a す word; none exist.
        let second = room.advance("りす", &rules, &index, verbatim);
        assert!(matches!(second, Outcome::EngineLoses { required: 'す', .. }));
    }

    #[test]
    fn lead_mismatch_rejected_without_state_change() {
        let rules = rules("しりとり");
        let index = index_of(&["まくら"]);
        let mut room = started(&rules);
        let before = room.state().clone();
        let outcome = room.advance("ごま", &rules, &index, verbatim);
        assert_eq!(
            outcome,
            Outcome::RejectedLeadMismatch {
                reading: "ごま".into(),
                required: 'り'
            }
        );
        assert_eq!(room.state(), &before);
    }

    #[test]
    fn unrecognized_when_reader_finds_nothing() {
        let rules = rules("しりとり");
        let index = index_of(&["まくら"]);
        let mut room = started(&rules);
        let before = room.state().clone();
        let outcome = room.advance("???", &rules, &index, |_| String::new());
        assert_eq!(outcome, Outcome::RejectedUnrecognized);
        assert_eq!(room.state(), &before);
    }

    #[test]
    fn single_character_reading_is_unrecognized() {
        let rules = rules("しりとり");
        let index = index_of(&["まくら"]);
        let mut room = started(&rules);
        assert_eq!(
            room.advance("り", &rules, &index, verbatim),
            Outcome::RejectedUnrecognized
        );
    }

    #[test]
    fn long_vowel_mark_chains_on_previous_character() {
        let rules = rules("すいか");
        let index = index_of(&["ひつじ", "ひまわり"]);
        let mut room = started(&rules);
        let outcome = room.advance("かれー", &rules, &index, verbatim);
        // かれー chains on れ; no れ words → engine loses on れ, not ー.
        assert_eq!(
            outcome,
            Outcome::EngineLoses {
                reading: "かれー".into(),
                required: 'れ'
            }
        );

        let coffee = Rules::new(TRIGGER, "こーひー", TerminalPolicy::Lose).unwrap();
        let mut room = started(&coffee);
        let outcome = room.advance("ひつじ", &coffee, &index, verbatim);
        assert!(matches!(outcome, Outcome::EngineLoses { required: 'じ', .. }));
    }

    #[test]
    fn engine_reply_sets_next_lead() {
        let rules = rules("りんご");
        let index = index_of(&["まくら", "らっぱ"]);
        let mut room = started(&rules);
        let outcome = room.advance("ごま", &rules, &index, verbatim);
        assert_eq!(
            outcome,
            Outcome::TurnAccepted {
                reading: "ごま".into(),
                reply: "まくら".into(),
                next: 'ら'
            }
        );
        // Next human word must start with ら.
        let outcome = room.advance("らっぱ", &rules, &index, verbatim);
        assert!(matches!(outcome, Outcome::EngineLoses { required: 'ぱ', .. }));
    }

    #[test]
    fn katakana_submission_is_normalized_by_reader() {
        let rules = rules("りんご");
        let index = index_of(&["まくら"]);
        let mut room = started(&rules);
        let outcome = room.advance("ゴマ", &rules, &index, verbatim);
        assert!(matches!(outcome, Outcome::TurnAccepted { .. }));
    }

    #[test]
    fn outcome_labels_and_game_over() {
        assert!(Outcome::HumanLoses { reading: "x".into() }.is_game_over());
        assert!(!Outcome::WaitingForStart.is_game_over());
        assert_eq!(Outcome::RejectedUnrecognized.label(), "rejected_unrecognized");
    }
}
