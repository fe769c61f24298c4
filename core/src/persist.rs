//! sled-backed [`DocumentStore`].
//!
//! Documents sit in the `documents` tree keyed by big-endian id so a scan returns them in id
//! order. The next id lives in the `meta` tree and is advanced atomically.

use crate::error::{Result, SearchError};
use crate::store::{Document, DocumentStore};
use crate::DocId;
use serde::{Deserialize, Serialize};
use std::path::Path;

const DOCUMENTS_TREE: &str = "documents";
const META_TREE: &str = "meta";
const NEXT_ID_KEY: &[u8] = b"next_doc_id";

#[derive(Debug, Serialize, Deserialize)]
struct StoredDocument {
    content: String,
}

pub struct SledStore {
    db: sled::Db,
    documents: sled::Tree,
    meta: sled::Tree,
}

impl SledStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_db(sled::open(path)?)
    }

    /// Store that is deleted when dropped.
    pub fn temporary() -> Result<Self> {
        Self::from_db(sled::Config::new().temporary(true).open()?)
    }

    fn from_db(db: sled::Db) -> Result<Self> {
        let documents = db.open_tree(DOCUMENTS_TREE)?;
        let meta = db.open_tree(META_TREE)?;
        Ok(Self { db, documents, meta })
    }

    /// Remove every document. Ids keep counting from where they were, so hits from an
    /// index built before the clear resolve to `NotFound` rather than to new documents.
    pub fn clear(&self) -> Result<()> {
        self.documents.clear()?;
        Ok(())
    }

    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }

    fn next_id(&self) -> Result<DocId> {
        let mut assigned: Result<DocId> = Ok(0);
        self.meta.update_and_fetch(NEXT_ID_KEY, |old| {
            assigned = old.map(decode_id).unwrap_or(Ok(0));
            match &assigned {
                Ok(id) => Some((id + 1).to_be_bytes().to_vec()),
                // leave a malformed counter untouched
                Err(_) => old.map(<[u8]>::to_vec),
            }
        })?;
        assigned
    }
}

fn decode_id(bytes: &[u8]) -> Result<DocId> {
    <[u8; 4]>::try_from(bytes).map(DocId::from_be_bytes).map_err(|_| {
        SearchError::Codec(Box::new(bincode::ErrorKind::Custom(format!(
            "malformed document id of {} bytes",
            bytes.len()
        ))))
    })
}

impl DocumentStore for SledStore {
    fn insert(&self, content: &str) -> Result<DocId> {
        let id = self.next_id()?;
        let bytes = bincode::serialize(&StoredDocument { content: content.to_owned() })?;
        self.documents.insert(id.to_be_bytes(), bytes)?;
        Ok(id)
    }

    fn fetch_all(&self) -> Result<Vec<Document>> {
        let mut out = Vec::with_capacity(self.documents.len());
        for entry in self.documents.iter() {
            let (key, value) = entry?;
            let stored: StoredDocument = bincode::deserialize(&value)?;
            out.push(Document { id: decode_id(&key)?, content: stored.content });
        }
        Ok(out)
    }

    fn count(&self) -> Result<usize> {
        Ok(self.documents.len())
    }

    fn fetch_one(&self, id: DocId) -> Result<String> {
        let value = self.documents.get(id.to_be_bytes())?.ok_or(SearchError::NotFound(id))?;
        let stored: StoredDocument = bincode::deserialize(&value)?;
        Ok(stored.content)
    }
}
