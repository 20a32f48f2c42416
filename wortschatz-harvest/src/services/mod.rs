//! External collaborators and supporting services

pub mod analyzer;
pub mod lexicon;
pub mod translation;

pub use analyzer::{TextAnalyzer, TokenRecord};
pub use lexicon::IrregularVerbs;
pub use translation::{TranslationProvider, WiktionaryClient};
