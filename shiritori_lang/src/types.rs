// Core lexical types: part-of-speech classes, lexicon entries, analyzer tokens.
//
// Both the lexicon (read once at startup) and the text analyzer (per
// submission) describe words with a part-of-speech *path*, e.g.
// `["名詞", "一般"]`, and a reading that may be the `*` placeholder. This
// module turns that raw shape into something the rest of the crate can
// match on:
// - `PartOfSpeech` — the classes shiritori cares about, plus `Other`
// - `PLAYABLE` — the explicit allow-list of classes a chain word may have
// - `LexEntry` — a JSON-loadable lexicon record
// - `Token` — one analyzed token from free text
//
// Classification happens once per entry at index build time and once per
// token at submission time, through the same `PartOfSpeech::classify`.

use serde::{Deserialize, Serialize};

/// Reading placeholder meaning "no reading known".
pub const NO_READING: &str = "*";

/// Part-of-speech class of a lexicon entry or analyzed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    /// Particles, auxiliaries, symbols, unknown tags.
    Other,
}

/// Classes a word must belong to before it can be played or indexed.
pub const PLAYABLE: [PartOfSpeech; 3] = [
    PartOfSpeech::Noun,
    PartOfSpeech::Verb,
    PartOfSpeech::Adjective,
];

/// Tag prefixes recognized for each playable class, Japanese and English.
const TAG_PREFIXES: &[(&str, PartOfSpeech)] = &[
    ("名詞", PartOfSpeech::Noun),
    ("noun", PartOfSpeech::Noun),
    ("動詞", PartOfSpeech::Verb),
    ("verb", PartOfSpeech::Verb),
    ("形容詞", PartOfSpeech::Adjective),
    ("adjective", PartOfSpeech::Adjective),
];

impl PartOfSpeech {
    /// Classify a part-of-speech path by its head tag.
    pub fn classify<S: AsRef<str>>(path: &[S]) -> Self {
        let Some(head) = path.first() else {
            return PartOfSpeech::Other;
        };
        let head = head.as_ref();
        TAG_PREFIXES
            .iter()
            .find(|(prefix, _)| head.starts_with(prefix))
            .map_or(PartOfSpeech::Other, |(_, pos)| *pos)
    }

    /// Whether this class is on the `PLAYABLE` allow-list.
    pub fn is_playable(self) -> bool {
        PLAYABLE.contains(&self)
    }
}

/// Treat the `*` placeholder and blank strings as "no reading".
fn present(reading: Option<&str>) -> Option<&str> {
    reading.filter(|r| !r.trim().is_empty() && *r != NO_READING)
}

/// A JSON-loadable lexicon record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexEntry {
    /// Written form, e.g. `胡麻`.
    pub surface: String,
    /// Raw reading, usually katakana. Absent or `*` when unknown.
    #[serde(default)]
    pub reading: Option<String>,
    /// Part-of-speech path, most general tag first.
    #[serde(default)]
    pub pos: Vec<String>,
}

impl LexEntry {
    pub fn part_of_speech(&self) -> PartOfSpeech {
        PartOfSpeech::classify(&self.pos)
    }

    /// The raw reading, unless missing or a placeholder.
    pub fn reading(&self) -> Option<&str> {
        present(self.reading.as_deref())
    }
}

/// One token produced by a text analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    #[serde(default)]
    pub pos: Vec<String>,
    #[serde(default)]
    pub reading: Option<String>,
}

impl Token {
    pub fn part_of_speech(&self) -> PartOfSpeech {
        PartOfSpeech::classify(&self.pos)
    }

    pub fn reading(&self) -> Option<&str> {
        present(self.reading.as_deref())
    }
}
