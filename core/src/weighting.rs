//! TF-IDF statistics and per-document weight vectors.
//!
//! Term frequency is the raw count of a term in a document. Inverse document frequency is
//! smoothed, `ln((1 + N) / (1 + df)) + 1`, so a term present in every document still carries
//! a positive weight. Document vectors are L2-normalized after weighting.

use crate::vector::SparseVector;
use crate::vocabulary::Vocabulary;
use crate::{DocId, TermId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A document's id and its full term sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedDocument {
    pub id: DocId,
    pub terms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentVector {
    pub doc_id: DocId,
    pub weights: SparseVector,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdfTable {
    num_docs: u32,
    df: Vec<u32>,
    idf: Vec<f64>,
}

impl IdfTable {
    /// Derive document frequencies from per-document term counts.
    pub fn from_frequencies(frequencies: &[BTreeMap<TermId, u32>], vocabulary_len: usize) -> Self {
        let mut df = vec![0u32; vocabulary_len];
        for counts in frequencies {
            for &term in counts.keys() {
                df[term as usize] += 1;
            }
        }
        let num_docs = frequencies.len() as u32;
        let idf = df.iter().map(|&d| smoothed_idf(num_docs, d)).collect();
        Self { num_docs, df, idf }
    }

    pub fn num_docs(&self) -> u32 { self.num_docs }

    pub fn idf(&self, term: TermId) -> Option<f64> {
        self.idf.get(term as usize).copied()
    }

    pub fn document_frequency(&self, term: TermId) -> Option<u32> {
        self.df.get(term as usize).copied()
    }
}

pub fn smoothed_idf(num_docs: u32, df: u32) -> f64 {
    ((1.0 + num_docs as f64) / (1.0 + df as f64)).ln() + 1.0
}

/// Raw counts of in-vocabulary terms. Unknown terms are skipped.
pub fn term_frequencies(terms: &[String], vocabulary: &Vocabulary) -> BTreeMap<TermId, u32> {
    let mut counts = BTreeMap::new();
    for term in terms {
        if let Some(pos) = vocabulary.position(term) {
            *counts.entry(pos).or_insert(0) += 1;
        }
    }
    counts
}

/// Unnormalized `tf * idf` vector.
pub fn weigh(counts: &BTreeMap<TermId, u32>, idf: &IdfTable) -> SparseVector {
    counts
        .iter()
        .filter_map(|(&term, &tf)| idf.idf(term).map(|w| (term, tf as f64 * w)))
        .collect()
}

pub struct Weights {
    pub idf: IdfTable,
    pub vectors: Vec<DocumentVector>,
}

/// Weigh every document against `vocabulary`, returning the IDF table and one normalized
/// vector per document in input order.
pub fn compute_weights(documents: &[TokenizedDocument], vocabulary: &Vocabulary) -> Weights {
    let frequencies: Vec<BTreeMap<TermId, u32>> = documents
        .iter()
        .map(|doc| term_frequencies(&doc.terms, vocabulary))
        .collect();
    let idf = IdfTable::from_frequencies(&frequencies, vocabulary.len());

    let vectors = documents
        .iter()
        .zip(frequencies.iter())
        .map(|(doc, counts)| {
            let mut weights = weigh(counts, &idf);
            weights.normalize();
            DocumentVector { doc_id: doc.id, weights }
        })
        .collect();
    Weights { idf, vectors }
}
