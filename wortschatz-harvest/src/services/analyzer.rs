//! Text analyzer collaborator seam
//!
//! Tokenization, lemmatization and POS tagging are not implemented here;
//! an external NLP engine fulfills this trait. The pipeline only depends
//! on the per-token records it returns.

use async_trait::async_trait;
use wortschatz_common::Result;

/// One analyzed token from the input text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    /// The inflected form as it appeared in the text
    pub surface: String,
    /// Dictionary (lemma) form
    pub lemma: String,
    /// Universal POS tag, e.g. "NOUN", "VERB", "AUX"
    pub pos: String,
}

impl TokenRecord {
    pub fn new(
        surface: impl Into<String>,
        lemma: impl Into<String>,
        pos: impl Into<String>,
    ) -> Self {
        Self {
            surface: surface.into(),
            lemma: lemma.into(),
            pos: pos.into(),
        }
    }
}

/// External tokenizer/lemmatizer/POS-tagger contract
#[async_trait]
pub trait TextAnalyzer: Send + Sync {
    /// Analyze cleaned text into word tokens. Non-word tokens (punctuation,
    /// digits) are the analyzer's job to drop.
    async fn analyze(&self, text: &str) -> Result<Vec<TokenRecord>>;
}
