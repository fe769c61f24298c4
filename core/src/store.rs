use crate::error::{Result, SearchError};
use crate::DocId;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub content: String,
}

/// Where documents live between builds. Ids are assigned on insert, starting at 0.
pub trait DocumentStore: Send + Sync {
    fn insert(&self, content: &str) -> Result<DocId>;

    /// Every document, ascending by id.
    fn fetch_all(&self) -> Result<Vec<Document>>;

    fn count(&self) -> Result<usize>;

    /// Fails with [`SearchError::NotFound`] for an unknown id.
    fn fetch_one(&self, id: DocId) -> Result<String>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }
}

impl DocumentStore for MemoryStore {
    fn insert(&self, content: &str) -> Result<DocId> {
        let mut docs = self.documents.write();
        let id = docs.len() as DocId;
        docs.push(content.to_owned());
        Ok(id)
    }

    fn fetch_all(&self) -> Result<Vec<Document>> {
        Ok(self
            .documents
            .read()
            .iter()
            .enumerate()
            .map(|(i, content)| Document { id: i as DocId, content: content.clone() })
            .collect())
    }

    fn count(&self) -> Result<usize> {
        Ok(self.documents.read().len())
    }

    fn fetch_one(&self, id: DocId) -> Result<String> {
        self.documents
            .read()
            .get(id as usize)
            .cloned()
            .ok_or(SearchError::NotFound(id))
    }
}
