use crate::TermId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sparse weight vector over vocabulary positions.
///
/// Entries are sorted by position and never hold a non-positive weight.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    entries: Vec<(TermId, f64)>,
}

impl SparseVector {
    pub fn new() -> Self { Self::default() }

    pub fn entries(&self) -> &[(TermId, f64)] { &self.entries }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn get(&self, term: TermId) -> Option<f64> {
        self.entries
            .binary_search_by_key(&term, |&(t, _)| t)
            .ok()
            .map(|i| self.entries[i].1)
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Scale to unit length. A zero vector stays zero.
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm == 0.0 { return; }
        for (_, w) in self.entries.iter_mut() {
            *w /= norm;
        }
    }

    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_term, a_w) = self.entries[i];
            let (b_term, b_w) = other.entries[j];
            match a_term.cmp(&b_term) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    sum += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    /// dot(a, b) / (|a| |b|), or 0 when either side has zero norm.
    pub fn cosine_similarity(&self, other: &SparseVector) -> f64 {
        let denom = self.norm() * other.norm();
        if denom == 0.0 { 0.0 } else { self.dot(other) / denom }
    }
}

impl FromIterator<(TermId, f64)> for SparseVector {
    fn from_iter<I: IntoIterator<Item = (TermId, f64)>>(iter: I) -> Self {
        let mut entries: Vec<(TermId, f64)> = iter.into_iter().filter(|&(_, w)| w > 0.0).collect();
        entries.sort_by_key(|&(t, _)| t);
        entries.dedup_by(|later, earlier| {
            if later.0 == earlier.0 {
                earlier.1 += later.1;
                true
            } else {
                false
            }
        });
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_sorted_and_drops_zeros() {
        let v: SparseVector = vec![(3, 1.0), (1, 0.0), (0, 2.0), (3, 1.0)].into_iter().collect();
        assert_eq!(v.entries(), &[(0, 2.0), (3, 2.0)]);
        assert_eq!(v.get(1), None);
    }

    #[test]
    fn normalize_zero_vector_is_noop() {
        let mut v = SparseVector::new();
        v.normalize();
        assert!(v.is_empty());
        assert_eq!(v.norm(), 0.0);
    }

    #[test]
    fn cosine_of_disjoint_and_zero_vectors() {
        let a: SparseVector = vec![(0, 3.0), (1, 4.0)].into_iter().collect();
        let b: SparseVector = vec![(2, 1.0)].into_iter().collect();
        assert_eq!(a.cosine_similarity(&b), 0.0);
        assert_eq!(a.cosine_similarity(&SparseVector::new()), 0.0);
        assert!((a.cosine_similarity(&a) - 1.0).abs() < 1e-12);
        let mut n = a.clone();
        n.normalize();
        assert!((n.norm() - 1.0).abs() < 1e-12);
        assert!((n.get(1).unwrap() - 0.8).abs() < 1e-12);
    }
}
