use std::collections::HashMap;

use crate::KbError;

/// Brute-force cosine-similarity index over fixed-dimension vectors.
///
/// Snapshots are small (thousands of records), so a linear scan beats the
/// complexity of a graph index here.
#[derive(Debug)]
pub struct VectorIndex {
    dimension: usize,
    vectors: HashMap<u64, Vec<f32>>,
}

impl VectorIndex {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            vectors: HashMap::new(),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn add(&mut self, id: u64, vector: &[f32]) -> Result<(), KbError> {
        if vector.len() != self.dimension {
            return Err(KbError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        self.vectors.insert(id, vector.to_vec());
        Ok(())
    }

    /// K nearest neighbors by cosine similarity, best first.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(u64, f32)>, KbError> {
        if query.len() != self.dimension {
            return Err(KbError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let mut scores: Vec<(u64, f32)> = self
            .vectors
            .iter()
            .map(|(id, vector)| (*id, cosine_similarity(query, vector)))
            .collect();

        scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scores.truncate(k);
        Ok(scores)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_search() {
        let mut index = VectorIndex::new(3);
        index.add(0, &[1.0, 0.0, 0.0]).unwrap();
        index.add(1, &[0.9, 0.1, 0.0]).unwrap();
        index.add(2, &[0.0, 1.0, 0.0]).unwrap();
        assert_eq!(index.len(), 3);

        let results = index.search(&[1.0, 0.0, 0.0], 2).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, 0);
        assert!((results[0].1 - 1.0).abs() < 1e-6);
        assert_eq!(results[1].0, 1);
        assert!(results[1].1 > 0.9);
    }

    #[test]
    fn dimension_mismatch_rejected() {
        let mut index = VectorIndex::new(3);
        assert!(matches!(
            index.add(0, &[1.0, 0.0]),
            Err(KbError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));

        index.add(0, &[1.0, 0.0, 0.0]).unwrap();
        assert!(index.search(&[1.0, 0.0], 1).is_err());
    }

    #[test]
    fn zero_vector_scores_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn k_larger_than_index() {
        let mut index = VectorIndex::new(2);
        index.add(0, &[1.0, 0.0]).unwrap();
        let results = index.search(&[1.0, 0.0], 10).unwrap();
        assert_eq!(results.len(), 1);
    }
}
