use crate::weighting::DocumentVector;
use crate::{DocId, TermId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub weight: f64, // normalized tf-idf weight, always > 0
}

/// Term position → postings sorted by doc_id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvertedIndex {
    postings: Vec<Vec<Posting>>,
    num_postings: usize,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Append a posting for every positive weight, visiting documents by increasing id.
    pub fn build(vectors: &[DocumentVector], vocabulary_len: usize) -> Self {
        let mut ordered: Vec<&DocumentVector> = vectors.iter().collect();
        ordered.sort_by_key(|v| v.doc_id);

        let mut postings: Vec<Vec<Posting>> = vec![Vec::new(); vocabulary_len];
        let mut num_postings = 0;
        for vector in ordered {
            for &(term, weight) in vector.weights.entries() {
                if weight <= 0.0 { continue; }
                if let Some(list) = postings.get_mut(term as usize) {
                    list.push(Posting { doc_id: vector.doc_id, weight });
                    num_postings += 1;
                }
            }
        }
        Self { postings, num_postings }
    }

    /// Postings for a term; empty when the term never occurs.
    pub fn postings_for(&self, term: TermId) -> &[Posting] {
        self.postings.get(term as usize).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn num_terms(&self) -> usize { self.postings.len() }

    pub fn num_postings(&self) -> usize { self.num_postings }

    pub fn iter(&self) -> impl Iterator<Item = (TermId, &[Posting])> + '_ {
        self.postings.iter().enumerate().map(|(t, p)| (t as TermId, p.as_slice()))
    }
}
