//! Vocabulary entry, tag, and query types

use serde::{Deserialize, Serialize};

/// Verb regularity.
///
/// Meaningful only for verb-like parts of speech; everything else is
/// `NotApplicable`. Stored in SQLite as 1 / 0 / NULL, matching the nullable
/// boolean column shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regularity {
    Regular,
    Irregular,
    NotApplicable,
}

impl Regularity {
    /// Database representation: 1 regular, 0 irregular, NULL not applicable
    pub fn as_db(self) -> Option<i64> {
        match self {
            Regularity::Regular => Some(1),
            Regularity::Irregular => Some(0),
            Regularity::NotApplicable => None,
        }
    }

    pub fn from_db(value: Option<i64>) -> Self {
        match value {
            Some(0) => Regularity::Irregular,
            Some(_) => Regularity::Regular,
            None => Regularity::NotApplicable,
        }
    }
}

/// Difficulty rating for a vocabulary entry.
///
/// 0 = known, 1 = very easy, 2 = easy, 3 = medium (default), 4 = hard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Known,
    VeryEasy,
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_i64(self) -> i64 {
        match self {
            Difficulty::Known => 0,
            Difficulty::VeryEasy => 1,
            Difficulty::Easy => 2,
            Difficulty::Medium => 3,
            Difficulty::Hard => 4,
        }
    }

    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(Difficulty::Known),
            1 => Some(Difficulty::VeryEasy),
            2 => Some(Difficulty::Easy),
            3 => Some(Difficulty::Medium),
            4 => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Medium
    }
}

/// A permanent vocabulary entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    /// Canonical lemma form, case-normalized
    pub word: String,
    pub part_of_speech: Option<String>,
    pub regularity: Regularity,
    pub translation: Option<String>,
    pub difficulty: Difficulty,
}

impl VocabularyEntry {
    pub fn new(word: impl Into<String>, part_of_speech: Option<String>) -> Self {
        Self {
            word: word.into(),
            part_of_speech,
            regularity: Regularity::NotApplicable,
            translation: None,
            difficulty: Difficulty::default(),
        }
    }
}

/// A tag usable on any number of vocabulary entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub tag_id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// Filter and search parameters for vocabulary listings.
///
/// Difficulty filter and substring search compose with AND. The search term
/// matches against the word or its translation.
#[derive(Debug, Clone, Default)]
pub struct WordQuery {
    pub difficulty: Option<Difficulty>,
    pub search_term: Option<String>,
    pub case_sensitive: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regularity_db_roundtrip() {
        for reg in [
            Regularity::Regular,
            Regularity::Irregular,
            Regularity::NotApplicable,
        ] {
            assert_eq!(Regularity::from_db(reg.as_db()), reg);
        }
    }

    #[test]
    fn difficulty_defaults_to_medium() {
        assert_eq!(Difficulty::default(), Difficulty::Medium);
        assert_eq!(Difficulty::default().as_i64(), 3);
    }

    #[test]
    fn difficulty_rejects_out_of_range() {
        assert_eq!(Difficulty::from_i64(5), None);
        assert_eq!(Difficulty::from_i64(-1), None);
        assert_eq!(Difficulty::from_i64(4), Some(Difficulty::Hard));
    }
}
