use crate::DocId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Debug, Error)]
pub enum SearchError {
    /// The store held no documents when a build was requested.
    #[error("no documents found to index")]
    EmptyCorpus,

    #[error("vocabulary not built: run a successful build before ranking")]
    VocabularyNotBuilt,

    #[error("document {0} not found")]
    NotFound(DocId),

    /// A ranking was produced against an index generation that has since been replaced.
    #[error("ranking from generation {ranked} is stale, current generation is {current}")]
    StaleRanking { ranked: u64, current: u64 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("storage error: {0}")]
    Storage(#[from] sled::Error),

    #[error("codec error: {0}")]
    Codec(#[from] bincode::Error),
}
