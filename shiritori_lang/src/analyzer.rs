// Text analysis seam: free text in, part-of-speech tokens out.
//
// Turning an arbitrary chat message into words with readings is a job for a
// morphological analyzer, which lives outside this crate. `TextAnalyzer` is
// the seam the referee calls through; the referee crate provides an HTTP
// implementation for an external service.
//
// `LexiconAnalyzer` is the in-process fallback used when no external
// analyzer is configured. It segments text by greedy longest match against
// every lexicon surface form and every canonical reading, so a player can
// type either `胡麻` or `ごま`. It knows nothing about inflection; a message
// like `ごまです` resolves to `ごま` only because `です` is left as unknown
// tokens after it.
//
// `first_playable_reading` is the rule the referee applies to whatever
// tokens come back: the first playable token with a reading is "the word".

use std::collections::BTreeMap;

use crate::Lexicon;
use crate::kana;
use crate::types::Token;

/// Failure talking to an analyzer.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("analyzer unavailable: {0}")]
    Unavailable(String),
    #[error("malformed analyzer response: {0}")]
    Malformed(String),
}

/// Something that can split free text into tagged tokens.
pub trait TextAnalyzer: Send + Sync {
    fn analyze(&self, text: &str) -> Result<Vec<Token>, AnalyzerError>;
}

/// Canonical reading of the first playable token, or `""` if none.
pub fn first_playable_reading(tokens: &[Token]) -> String {
    tokens
        .iter()
        .filter(|t| t.part_of_speech().is_playable())
        .find_map(|t| t.reading())
        .map(kana::to_canonical)
        .unwrap_or_default()
}

/// Greedy longest-match analyzer over the lexicon's own forms.
#[derive(Debug, Clone)]
pub struct LexiconAnalyzer {
    forms: BTreeMap<String, Token>,
    max_form_len: usize,
}

impl LexiconAnalyzer {
    pub fn new(lexicon: &Lexicon) -> Self {
        let mut analyzer = LexiconAnalyzer {
            forms: BTreeMap::new(),
            max_form_len: 0,
        };
        for entry in lexicon.all() {
            let token = Token {
                pos: entry.pos.clone(),
                reading: entry.reading().map(String::from),
            };
            analyzer.add_form(entry.surface.clone(), &token);
            if let Some(reading) = entry.reading() {
                analyzer.add_form(kana::to_canonical(reading), &token);
            }
        }
        analyzer
    }

    /// Register a form. A playable token displaces a non-playable one, so
    /// `が` resolves to the noun `蛾` rather than the particle.
    fn add_form(&mut self, form: String, token: &Token) {
        if form.is_empty() {
            return;
        }
        let len = form.chars().count();
        let replace = match self.forms.get(&form) {
            None => true,
            Some(existing) => {
                !existing.part_of_speech().is_playable() && token.part_of_speech().is_playable()
            }
        };
        if replace {
            self.max_form_len = self.max_form_len.max(len);
            self.forms.insert(form, token.clone());
        }
    }

    fn lookup(&self, candidate: &str) -> Option<&Token> {
        self.forms
            .get(candidate)
            .or_else(|| self.forms.get(&kana::to_canonical(candidate)))
    }
}

impl TextAnalyzer for LexiconAnalyzer {
    fn analyze(&self, text: &str) -> Result<Vec<Token>, AnalyzerError> {
        let chars: Vec<char> = text.chars().collect();
        let mut tokens = Vec::new();
        let mut i = 0;
        while i < chars.len() {
            if chars[i].is_whitespace() {
                i += 1;
                continue;
            }
            let longest = self.max_form_len.min(chars.len() - i);
            let matched = (1..=longest).rev().find_map(|len| {
                let candidate: String = chars[i..i + len].iter().collect();
                self.lookup(&candidate).map(|token| (len, token.clone()))
            });
            match matched {
                Some((len, token)) => {
                    tokens.push(token);
                    i += len;
                }
                None => {
                    tokens.push(Token {
                        pos: Vec::new(),
                        reading: None,
                    });
                    i += 1;
                }
            }
        }
        Ok(tokens)
    }
}
