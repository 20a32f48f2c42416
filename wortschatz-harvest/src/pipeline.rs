//! Harvest pipeline
//!
//! Wires the external analyzer, the known-word filter, verb classification
//! and translation lookup into staging writes. From the session manager's
//! perspective this is an opaque collaborator behind the [`Pipeline`]
//! trait.

use async_trait::async_trait;
use sqlx::SqlitePool;
use std::collections::HashSet;
use tracing::{debug, info};
use wortschatz_common::Result;

use crate::db::{staging, vocabulary};
use crate::models::StagedCandidate;
use crate::services::{IrregularVerbs, TextAnalyzer, TranslationProvider};

/// Counters returned from one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutcome {
    pub session_id: String,
    pub words_processed: u64,
    pub words_staged: u64,
    pub words_translated: u64,
}

/// Pipeline collaborator contract consumed by the session lifecycle
/// manager: `None` means the text contained nothing processable.
#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn process(&self, cleaned_text: &str, session_id: &str) -> Result<Option<PipelineOutcome>>;
}

/// Validate and clean raw text input: trim and collapse runs of whitespace.
pub fn clean_text_input(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Default pipeline: analyzer → known-word filter → translation → staging.
pub struct HarvestPipeline<A, T> {
    analyzer: A,
    translator: T,
    lexicon: IrregularVerbs,
    pool: SqlitePool,
}

impl<A, T> HarvestPipeline<A, T>
where
    A: TextAnalyzer,
    T: TranslationProvider,
{
    pub fn new(analyzer: A, translator: T, lexicon: IrregularVerbs, pool: SqlitePool) -> Self {
        Self {
            analyzer,
            translator,
            lexicon,
            pool,
        }
    }
}

#[async_trait]
impl<A, T> Pipeline for HarvestPipeline<A, T>
where
    A: TextAnalyzer,
    T: TranslationProvider,
{
    async fn process(
        &self,
        cleaned_text: &str,
        session_id: &str,
    ) -> Result<Option<PipelineOutcome>> {
        let tokens = self.analyzer.analyze(cleaned_text).await?;
        if tokens.is_empty() {
            debug!(session_id = %session_id, "no word tokens in input");
            return Ok(None);
        }

        let mut outcome = PipelineOutcome {
            session_id: session_id.to_string(),
            words_processed: 0,
            words_staged: 0,
            words_translated: 0,
        };
        // Lemmas staged during this run, so a re-inflection of an
        // already-staged lemma doesn't bump the counter again
        let mut staged_lemmas: HashSet<String> = HashSet::new();

        for token in tokens {
            outcome.words_processed += 1;

            let surface = token.surface.to_lowercase();
            let lemma = token.lemma.to_lowercase();
            let pos = Some(token.pos.clone()).filter(|p| !p.is_empty());

            if vocabulary::word_exists(&self.pool, &lemma).await? {
                debug!(lemma = %lemma, "already in vocabulary, skipping");
                continue;
            }

            if staging::candidate_exists(&self.pool, &surface, session_id).await? {
                debug!(surface = %surface, "token already staged in this session");
                continue;
            }

            // Translation happens before the staging write so no store
            // operation spans the network call
            let translation = self.translator.translate(&lemma, pos.as_deref()).await;
            if translation.is_some() {
                outcome.words_translated += 1;
            }

            let regularity = self.lexicon.classify(&lemma, pos.as_deref());

            let candidate = StagedCandidate::new(
                surface,
                lemma.clone(),
                pos,
                translation,
                regularity,
                session_id,
            );
            staging::add_candidate(&self.pool, &candidate).await?;

            if staged_lemmas.insert(lemma) {
                outcome.words_staged += 1;
            }
        }

        info!(
            session_id = %session_id,
            processed = outcome.words_processed,
            staged = outcome.words_staged,
            translated = outcome.words_translated,
            "pipeline run complete"
        );

        Ok(Some(outcome))
    }
}
