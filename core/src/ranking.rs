use crate::error::Result;
use crate::index::InvertedIndex;
use crate::store::Document;
use crate::tokenizer::Tokenizer;
use crate::vector::SparseVector;
use crate::vocabulary::Vocabulary;
use crate::weighting::{compute_weights, term_frequencies, weigh, DocumentVector, IdfTable, TokenizedDocument};
use crate::DocId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredDoc {
    pub doc_id: DocId,
    pub score: f64,
}

/// The frozen result of one build: vocabulary, IDF statistics, document vectors and the
/// inverted index derived from them. Never mutated after construction; a rebuild produces a
/// new value.
#[derive(Debug)]
pub struct SearchIndex {
    generation: u64,
    tokenizer: Tokenizer,
    vocabulary: Vocabulary,
    idf: IdfTable,
    vectors: Vec<DocumentVector>,
    rows: HashMap<DocId, usize>,
    norms: Vec<f64>,
    inverted: InvertedIndex,
}

impl SearchIndex {
    pub fn build(documents: &[Document], tokenizer: Tokenizer, generation: u64) -> Result<Self> {
        let tokenized: Vec<TokenizedDocument> = documents
            .iter()
            .map(|d| TokenizedDocument { id: d.id, terms: tokenizer.tokenize(&d.content) })
            .collect();
        let vocabulary = Vocabulary::build(tokenized.iter().map(|d| d.terms.as_slice()))?;
        let weights = compute_weights(&tokenized, &vocabulary);
        let inverted = InvertedIndex::build(&weights.vectors, vocabulary.len());

        let rows = weights.vectors.iter().enumerate().map(|(row, v)| (v.doc_id, row)).collect();
        let norms = weights.vectors.iter().map(|v| v.weights.norm()).collect();
        Ok(Self {
            generation,
            tokenizer,
            vocabulary,
            idf: weights.idf,
            vectors: weights.vectors,
            rows,
            norms,
            inverted,
        })
    }

    pub fn generation(&self) -> u64 { self.generation }

    pub fn tokenizer(&self) -> &Tokenizer { &self.tokenizer }

    pub fn vocabulary(&self) -> &Vocabulary { &self.vocabulary }

    pub fn idf(&self) -> &IdfTable { &self.idf }

    pub fn inverted_index(&self) -> &InvertedIndex { &self.inverted }

    pub fn num_docs(&self) -> usize { self.vectors.len() }

    pub fn document_vector(&self, doc_id: DocId) -> Option<&DocumentVector> {
        self.rows.get(&doc_id).map(|&row| &self.vectors[row])
    }

    pub fn document_vectors(&self) -> &[DocumentVector] { &self.vectors }

    /// `tf * idf` vector of a query against the frozen vocabulary. Unknown terms are dropped.
    pub fn vectorize_query(&self, text: &str) -> SparseVector {
        let terms = self.tokenizer.tokenize(text);
        weigh(&term_frequencies(&terms, &self.vocabulary), &self.idf)
    }

    /// Cosine similarity of the query against every document sharing a term with it,
    /// descending by score then ascending by doc id. Only positive scores are returned.
    pub fn rank(&self, query: &str) -> Vec<ScoredDoc> {
        let query_vec = self.vectorize_query(query);
        let query_norm = query_vec.norm();
        if query_norm == 0.0 {
            return Vec::new();
        }

        // Query entries are sorted by term, so each document's sum is accumulated in a fixed order.
        let mut dots: BTreeMap<DocId, f64> = BTreeMap::new();
        for &(term, q_w) in query_vec.entries() {
            for p in self.inverted.postings_for(term) {
                *dots.entry(p.doc_id).or_insert(0.0) += q_w * p.weight;
            }
        }

        let mut scored: Vec<ScoredDoc> = dots
            .into_iter()
            .filter_map(|(doc_id, dot)| {
                let doc_norm = self.rows.get(&doc_id).map(|&row| self.norms[row]).unwrap_or(0.0);
                if doc_norm == 0.0 {
                    return None;
                }
                let score = dot / (query_norm * doc_norm);
                (score > 0.0).then_some(ScoredDoc { doc_id, score })
            })
            .collect();
        scored.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.doc_id.cmp(&b.doc_id)));
        scored
    }
}
