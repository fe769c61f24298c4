use crate::config::TokenizerConfig;
use crate::error::{Result, SearchError};
use crate::ranking::{ScoredDoc, SearchIndex};
use crate::store::DocumentStore;
use crate::tokenizer::Tokenizer;
use crate::DocId;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::sync::Arc;

/// Hits produced against one index generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking {
    pub generation: u64,
    pub hits: Vec<ScoredDoc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedDocument {
    pub doc_id: DocId,
    pub score: f64,
    pub content: String,
}

/// A document store plus the most recently published [`SearchIndex`].
///
/// Builds are serialized and swap the whole index in at once; readers holding an older
/// `Arc<SearchIndex>` keep a consistent view until they drop it.
pub struct SearchEngine<S> {
    store: S,
    tokenizer: Tokenizer,
    current: RwLock<Option<Arc<SearchIndex>>>,
    build_lock: Mutex<u64>,
}

impl<S: DocumentStore> SearchEngine<S> {
    pub fn new(store: S, config: TokenizerConfig) -> Result<Self> {
        Ok(Self {
            store,
            tokenizer: Tokenizer::new(config)?,
            current: RwLock::new(None),
            build_lock: Mutex::new(0),
        })
    }

    pub fn store(&self) -> &S { &self.store }

    pub fn add_document(&self, content: &str) -> Result<DocId> {
        self.store.insert(content)
    }

    /// Rebuild from every stored document and publish the result.
    ///
    /// With an empty store this returns [`SearchError::EmptyCorpus`] and the previously
    /// published index, if any, stays in place.
    pub fn build(&self) -> Result<Arc<SearchIndex>> {
        let mut last_generation = self.build_lock.lock();
        let documents = self.store.fetch_all()?;
        if documents.is_empty() {
            tracing::warn!("no documents found to process");
            return Err(SearchError::EmptyCorpus);
        }

        let generation = *last_generation + 1;
        let index = Arc::new(SearchIndex::build(&documents, self.tokenizer.clone(), generation)?);
        *self.current.write() = Some(Arc::clone(&index));
        *last_generation = generation;

        tracing::info!(
            generation,
            num_docs = index.num_docs(),
            num_terms = index.vocabulary().len(),
            num_postings = index.inverted_index().num_postings(),
            "inverted index built"
        );
        Ok(index)
    }

    /// The published index, or [`SearchError::VocabularyNotBuilt`] before the first build.
    pub fn snapshot(&self) -> Result<Arc<SearchIndex>> {
        self.current.read().clone().ok_or(SearchError::VocabularyNotBuilt)
    }

    pub fn generation(&self) -> Option<u64> {
        self.current.read().as_ref().map(|idx| idx.generation())
    }

    pub fn rank(&self, query: &str) -> Result<Ranking> {
        let index = self.snapshot()?;
        let hits = index.rank(query);
        tracing::debug!(query, hits = hits.len(), generation = index.generation(), "ranked query");
        Ok(Ranking { generation: index.generation(), hits })
    }

    /// Attach stored content to each hit. Rankings from a replaced generation are refused.
    pub fn resolve(&self, ranking: &Ranking) -> Result<Vec<RankedDocument>> {
        let current = self.snapshot()?.generation();
        if ranking.generation != current {
            return Err(SearchError::StaleRanking { ranked: ranking.generation, current });
        }
        self.fetch_hits(&ranking.hits)
    }

    /// Rank and resolve against a single snapshot.
    pub fn search(&self, query: &str) -> Result<Vec<RankedDocument>> {
        let index = self.snapshot()?;
        self.fetch_hits(&index.rank(query))
    }

    fn fetch_hits(&self, hits: &[ScoredDoc]) -> Result<Vec<RankedDocument>> {
        hits.iter()
            .map(|hit| {
                Ok(RankedDocument {
                    doc_id: hit.doc_id,
                    score: hit.score,
                    content: self.store.fetch_one(hit.doc_id)?,
                })
            })
            .collect()
    }
}
