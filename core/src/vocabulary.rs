use crate::error::{Result, SearchError};
use crate::TermId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Dense term → position mapping, frozen once built.
///
/// Positions follow the lexicographic order of the distinct terms, so the same corpus always
/// yields the same assignment no matter how its documents are ordered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    positions: HashMap<String, TermId>,
    terms: Vec<String>,
}

impl Vocabulary {
    /// Collect the distinct terms of every document's term sequence.
    ///
    /// Fails with [`SearchError::EmptyCorpus`] when there are no documents at all. Documents
    /// that are themselves empty are fine and simply contribute nothing.
    pub fn build<'a, I>(documents: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a [String]>,
    {
        let mut saw_document = false;
        let mut distinct: BTreeSet<&'a str> = BTreeSet::new();
        for terms in documents {
            saw_document = true;
            distinct.extend(terms.iter().map(String::as_str));
        }
        if !saw_document {
            return Err(SearchError::EmptyCorpus);
        }

        let terms: Vec<String> = distinct.into_iter().map(str::to_owned).collect();
        let positions = terms
            .iter()
            .enumerate()
            .map(|(pos, term)| (term.clone(), pos as TermId))
            .collect();
        Ok(Self { positions, terms })
    }

    pub fn position(&self, term: &str) -> Option<TermId> {
        self.positions.get(term).copied()
    }

    pub fn term(&self, position: TermId) -> Option<&str> {
        self.terms.get(position as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize { self.terms.len() }

    pub fn is_empty(&self) -> bool { self.terms.is_empty() }

    /// Terms in position order.
    pub fn iter(&self) -> impl Iterator<Item = (TermId, &str)> + '_ {
        self.terms.iter().enumerate().map(|(pos, t)| (pos as TermId, t.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn positions_are_dense_and_sorted() {
        let docs = vec![terms(&["the", "cat"]), terms(&["a", "cat"])];
        let vocab = Vocabulary::build(docs.iter().map(Vec::as_slice)).unwrap();
        assert_eq!(vocab.len(), 3);
        assert_eq!(vocab.position("a"), Some(0));
        assert_eq!(vocab.position("cat"), Some(1));
        assert_eq!(vocab.position("the"), Some(2));
        assert_eq!(vocab.term(1), Some("cat"));
        assert_eq!(vocab.position("dog"), None);
    }

    #[test]
    fn no_documents_is_empty_corpus() {
        let docs: Vec<Vec<String>> = Vec::new();
        let err = Vocabulary::build(docs.iter().map(Vec::as_slice)).unwrap_err();
        assert!(matches!(err, SearchError::EmptyCorpus));
    }

    #[test]
    fn empty_documents_give_empty_vocabulary() {
        let docs = vec![Vec::new()];
        let vocab = Vocabulary::build(docs.iter().map(Vec::as_slice)).unwrap();
        assert!(vocab.is_empty());
    }
}
