//! Irregular verb lexicon
//!
//! Loaded from a plain word list, one lemma per line. Used to classify
//! verb regularity while staging; non-verbs are never classified.

use std::collections::HashSet;
use std::path::Path;
use tracing::info;
use wortschatz_common::Result;

use crate::models::Regularity;

/// POS tags that carry a regularity classification
const VERB_TAGS: [&str; 2] = ["VERB", "AUX"];

#[derive(Debug, Clone, Default)]
pub struct IrregularVerbs {
    words: HashSet<String>,
}

impl IrregularVerbs {
    /// Load the lexicon from a word-list file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let lexicon = Self::from_words(content.lines());
        info!(
            path = %path.display(),
            verbs = lexicon.words.len(),
            "loaded irregular verb lexicon"
        );
        Ok(lexicon)
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// Classify a lemma's regularity for the given POS tag
    pub fn classify(&self, lemma: &str, pos: Option<&str>) -> Regularity {
        let is_verb = pos.is_some_and(|p| VERB_TAGS.contains(&p));
        if !is_verb {
            return Regularity::NotApplicable;
        }

        if self.words.contains(&lemma.trim().to_lowercase()) {
            Regularity::Irregular
        } else {
            Regularity::Regular
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_verbs_against_lexicon() {
        let lexicon = IrregularVerbs::from_words(["laufen", "sein", ""]);

        assert_eq!(
            lexicon.classify("laufen", Some("VERB")),
            Regularity::Irregular
        );
        assert_eq!(lexicon.classify("sein", Some("AUX")), Regularity::Irregular);
        assert_eq!(
            lexicon.classify("machen", Some("VERB")),
            Regularity::Regular
        );
    }

    #[test]
    fn non_verbs_are_not_applicable() {
        let lexicon = IrregularVerbs::from_words(["laufen"]);

        assert_eq!(
            lexicon.classify("laufen", Some("NOUN")),
            Regularity::NotApplicable
        );
        assert_eq!(lexicon.classify("haus", None), Regularity::NotApplicable);
    }

    #[test]
    fn load_reads_one_word_per_line() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("irregular_verbs.txt");
        std::fs::write(&path, "laufen\n  Gehen \n\nsein\n").unwrap();

        let lexicon = IrregularVerbs::load(&path).unwrap();
        assert_eq!(lexicon.len(), 3);
        assert_eq!(
            lexicon.classify("gehen", Some("VERB")),
            Regularity::Irregular
        );
    }
}
