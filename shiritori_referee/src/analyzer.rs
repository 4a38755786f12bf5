// HTTP client for an external morphological analyzer.
//
// The service takes `{"text": "..."}` and answers
// `{"tokens": [{"pos": [...], "reading": "..."}]}` in text order. Token
// fields map straight onto `shiritori_lang::Token`; picking the word out of
// them is `first_playable_reading`'s job, not this module's.

use std::time::Duration;

use shiritori_lang::{AnalyzerError, TextAnalyzer, Token};
use shiritori_protocol::{AnalyzeRequest, AnalyzeResponse};

pub struct HttpAnalyzer {
    agent: ureq::Agent,
    url: String,
}

impl HttpAnalyzer {
    pub fn new(url: &str, timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            url: url.to_string(),
        }
    }
}

impl TextAnalyzer for HttpAnalyzer {
    fn analyze(&self, text: &str) -> Result<Vec<Token>, AnalyzerError> {
        let response = self
            .agent
            .post(&self.url)
            .send_json(AnalyzeRequest {
                text: text.to_string(),
            })
            .map_err(|e| AnalyzerError::Unavailable(e.to_string()))?;
        let body: AnalyzeResponse = response
            .into_json()
            .map_err(|e| AnalyzerError::Malformed(e.to_string()))?;
        Ok(body
            .tokens
            .into_iter()
            .map(|t| Token {
                pos: t.pos,
                reading: t.reading,
            })
            .collect())
    }
}
