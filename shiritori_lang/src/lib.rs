// Shiritori language crate: everything the referee knows about words.
//
// Pure and transport-free; the referee crate drives it. No logging, no
// network, and the only file I/O is `Lexicon::from_path`.
//
// Architecture:
// - `kana.rs`:     Reading normalizer (katakana → hiragana), last-effective-
//                  character rule, display rendering
// - `types.rs`:    `PartOfSpeech` classification, `LexEntry`, `Token`
// - `index.rs`:    `WordIndex` — lead character → set of canonical readings
// - `moves.rs`:    Move selector — uniform draw of an unused candidate
// - `analyzer.rs`: `TextAnalyzer` seam and the in-process `LexiconAnalyzer`
// - `lib.rs` (this file): `Lexicon` — loads the JSON word list
//
// The lexicon is a JSON document `{"words": [...]}` loaded via
// `Lexicon::from_json()` or `Lexicon::from_path()`. `default_lexicon()`
// embeds `data/lexicon.json` at compile time so the referee can run without
// an external dictionary.
//
// Determinism constraint: given the same lexicon and the same `GameRng`
// seed, index construction and move selection produce the same results.
// Ordered collections only (no HashMap iteration order leaks out).

pub mod analyzer;
pub mod index;
pub mod kana;
pub mod moves;
pub mod types;

use std::path::Path;

// Re-export key types at crate root for convenience.
pub use analyzer::{AnalyzerError, LexiconAnalyzer, TextAnalyzer, first_playable_reading};
pub use index::WordIndex;
pub use moves::select_move;
pub use types::{LexEntry, PLAYABLE, PartOfSpeech, Token};

/// Failure to obtain a lexicon. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    #[error("cannot read lexicon {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed lexicon: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The top-level JSON structure for the lexicon file.
#[derive(Debug, serde::Deserialize)]
struct LexiconFile {
    words: Vec<LexEntry>,
}

/// A loaded lexicon, in file order.
#[derive(Debug, Clone)]
pub struct Lexicon {
    entries: Vec<LexEntry>,
}

impl Lexicon {
    /// Parse a lexicon from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, LexiconError> {
        let file: LexiconFile = serde_json::from_str(json)?;
        Ok(Lexicon {
            entries: file.words,
        })
    }

    /// Read and parse a lexicon file.
    pub fn from_path(path: &Path) -> Result<Self, LexiconError> {
        let json = std::fs::read_to_string(path).map_err(|source| LexiconError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// All entries in the lexicon, in file order.
    pub fn all(&self) -> &[LexEntry] {
        &self.entries
    }
}

/// Load the default lexicon embedded at compile time.
///
/// Panics if the embedded JSON is malformed (should never happen in a
/// released build; `test_default_lexicon_loads` guards it).
pub fn default_lexicon() -> Lexicon {
    let json = include_str!("../../data/lexicon.json");
    Lexicon::from_json(json).expect("embedded lexicon.json is malformed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexicon_from_json() {
        let json = r#"{"words": [
            {"surface": "胡麻", "reading": "ゴマ", "pos": ["名詞", "一般"]},
            {"surface": "走る", "reading": "ハシル", "pos": ["動詞", "自立"]}
        ]}"#;

        let lexicon = Lexicon::from_json(json).unwrap();
        assert_eq!(lexicon.all().len(), 2);
        assert_eq!(lexicon.all()[0].surface, "胡麻");
        assert_eq!(lexicon.all()[1].surface, "走る");
    }

    #[test]
    fn test_lexicon_classifies_pos() {
        let json = r#"{"words": [
            {"surface": "胡麻", "reading": "ゴマ", "pos": ["名詞", "一般"]},
            {"surface": "走る", "reading": "ハシル", "pos": ["動詞", "自立"]},
            {"surface": "が", "reading": "ガ", "pos": ["助詞", "格助詞"]}
        ]}"#;

        let lexicon = Lexicon::from_json(json).unwrap();
        let pos: Vec<_> = lexicon.all().iter().map(|e| e.part_of_speech()).collect();
        assert_eq!(
            pos,
            vec![PartOfSpeech::Noun, PartOfSpeech::Verb, PartOfSpeech::Other]
        );
    }

    #[test]
    fn test_lexicon_malformed_json() {
        let err = Lexicon::from_json(r#"{"entries": []}"#).unwrap_err();
        assert!(matches!(err, LexiconError::Parse(_)));
    }

    #[test]
    fn test_lexicon_missing_file() {
        let err = Lexicon::from_path(Path::new("/nonexistent/shiritori/lexicon.json")).unwrap_err();
        match err {
            LexiconError::Io { path, .. } => assert!(path.contains("lexicon.json")),
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn test_default_lexicon_loads() {
        let lexicon = default_lexicon();
        assert!(
            lexicon.all().len() >= 100,
            "Expected >= 100 words, got {}",
            lexicon.all().len()
        );
    }

    #[test]
    fn test_default_lexicon_has_all_playable_pos() {
        let lexicon = default_lexicon();
        for pos in PLAYABLE {
            assert!(
                lexicon.all().iter().any(|e| e.part_of_speech() == pos),
                "Should have {pos:?} entries"
            );
        }
    }
}
