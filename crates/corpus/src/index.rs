//! The corpus index — every candidate exemplar plus its vector.
//!
//! Built once by repeated [`CorpusIndex::add`], then shared read-only
//! (usually as `Arc<CorpusIndex>`, see [`crate::handle::CorpusHandle`]).
//! All read operations take `&self`, so any number of concurrent requests
//! can iterate the same index without locking.

use crate::vector::check_vector;
use fewshot_core::error::CorpusError;
use fewshot_core::exemplar::{Exemplar, ExemplarId};
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct Entry {
    exemplar: Exemplar,
    vector: Vec<f32>,
}

/// Insertion-ordered exemplar store with a fixed vector dimension.
#[derive(Debug, Clone, Default)]
pub struct CorpusIndex {
    entries: Vec<Entry>,
    positions: HashMap<ExemplarId, usize>,
    dimension: Option<usize>,
}

impl CorpusIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an exemplar with its vector.
    ///
    /// The first insert fixes the dimension. A failed insert leaves the index
    /// unchanged.
    pub fn add(&mut self, exemplar: Exemplar, vector: Vec<f32>) -> Result<(), CorpusError> {
        if self.positions.contains_key(&exemplar.id) {
            return Err(CorpusError::DuplicateId(exemplar.id));
        }
        if let Some(expected) = self.dimension {
            if vector.len() != expected {
                return Err(CorpusError::DimensionMismatch {
                    expected,
                    actual: vector.len(),
                });
            }
        }
        check_vector(&vector)?;

        self.dimension.get_or_insert(vector.len());
        self.positions.insert(exemplar.id.clone(), self.entries.len());
        self.entries.push(Entry { exemplar, vector });
        Ok(())
    }

    /// Look up an exemplar by id.
    pub fn get(&self, id: &ExemplarId) -> Result<&Exemplar, CorpusError> {
        self.positions
            .get(id)
            .map(|&i| &self.entries[i].exemplar)
            .ok_or_else(|| CorpusError::NotFound(id.clone()))
    }

    /// Look up the vector stored for an exemplar.
    pub fn vector(&self, id: &ExemplarId) -> Result<&[f32], CorpusError> {
        self.positions
            .get(id)
            .map(|&i| self.entries[i].vector.as_slice())
            .ok_or_else(|| CorpusError::NotFound(id.clone()))
    }

    pub fn contains(&self, id: &ExemplarId) -> bool {
        self.positions.contains_key(id)
    }

    /// All (exemplar, vector) pairs in insertion order.
    ///
    /// Every call starts a fresh pass; the iterator itself is `Clone`.
    pub fn all(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Vector dimension, fixed by the first insert. `None` while empty.
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }
}

/// Iterator over `(exemplar, vector)` pairs. See [`CorpusIndex::all`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    inner: std::slice::Iter<'a, Entry>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a Exemplar, &'a [f32]);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|e| (&e.exemplar, e.vector.as_slice()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}
