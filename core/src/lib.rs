pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod persist;
pub mod ranking;
pub mod store;
pub mod tokenizer;
pub mod vector;
pub mod vocabulary;
pub mod weighting;

pub type TermId = u32;
pub type DocId = u32;

pub use config::TokenizerConfig;
pub use engine::{RankedDocument, Ranking, SearchEngine};
pub use error::{Result, SearchError};
pub use index::{InvertedIndex, Posting};
pub use persist::SledStore;
pub use ranking::{ScoredDoc, SearchIndex};
pub use store::{Document, DocumentStore, MemoryStore};
pub use tokenizer::Tokenizer;
pub use vector::SparseVector;
pub use vocabulary::Vocabulary;
pub use weighting::{DocumentVector, IdfTable};
