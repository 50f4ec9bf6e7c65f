//! Embedding + mean pooling + dense network loaded from a JSON artifact.

use std::path::Path;

use serde::Deserialize;

use super::SequenceModel;
use crate::error::{ArtifactError, BackendError};

#[derive(Debug, Clone, Deserialize)]
struct Dense {
    weights: Vec<Vec<f32>>,
    bias: Vec<f32>,
}

/// A small sequence classifier.
///
/// Each non-padding token is embedded, the embeddings are averaged, and a
/// dense layer produces either one sigmoid probability or a softmax
/// distribution over three classes.
#[derive(Debug, Clone, Deserialize)]
pub struct PooledNetwork {
    embedding: Vec<Vec<f32>>,
    dense: Dense,
}

impl PooledNetwork {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ArtifactError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, ArtifactError> {
        let network: PooledNetwork = serde_json::from_str(json)?;
        network.validate()?;
        Ok(network)
    }

    pub fn vocab_size(&self) -> usize {
        self.embedding.len()
    }

    pub fn output_width(&self) -> usize {
        self.dense.bias.len()
    }

    fn dim(&self) -> usize {
        self.embedding.first().map_or(0, Vec::len)
    }

    fn validate(&self) -> Result<(), ArtifactError> {
        let dim = self.dim();
        if dim == 0 {
            return Err(ArtifactError::Invalid("embedding is empty".to_string()));
        }
        if self.embedding.iter().any(|row| row.len() != dim) {
            return Err(ArtifactError::Invalid("ragged embedding matrix".to_string()));
        }
        if !matches!(self.output_width(), 1 | 3) {
            return Err(ArtifactError::Invalid(format!(
                "dense layer has {} outputs, expected 1 or 3",
                self.output_width()
            )));
        }
        if self.dense.weights.len() != self.output_width()
            || self.dense.weights.iter().any(|row| row.len() != dim)
        {
            return Err(ArtifactError::Invalid(
                "dense weights do not match embedding dimension".to_string(),
            ));
        }
        Ok(())
    }

    fn forward(&self, sequence: &[u32]) -> Result<Vec<f32>, BackendError> {
        let dim = self.dim();
        let mut pooled = vec![0.0f32; dim];
        let mut count = 0usize;

        for &id in sequence.iter().filter(|id| **id != 0) {
            let row = self.embedding.get(id as usize).ok_or_else(|| {
                BackendError::Inference(format!(
                    "token id {} outside vocabulary of {}",
                    id,
                    self.vocab_size()
                ))
            })?;
            for (p, v) in pooled.iter_mut().zip(row) {
                *p += v;
            }
            count += 1;
        }
        if count > 0 {
            for p in pooled.iter_mut() {
                *p /= count as f32;
            }
        }

        let logits: Vec<f32> = self
            .dense
            .weights
            .iter()
            .zip(&self.dense.bias)
            .map(|(w, b)| w.iter().zip(&pooled).map(|(w, x)| w * x).sum::<f32>() + b)
            .collect();

        Ok(if logits.len() == 1 {
            vec![sigmoid(logits[0])]
        } else {
            softmax(&logits)
        })
    }
}

impl SequenceModel for PooledNetwork {
    fn predict(&self, batch: &[Vec<u32>]) -> Result<Vec<Vec<f32>>, BackendError> {
        batch.iter().map(|seq| self.forward(seq)).collect()
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|l| (l - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.iter().map(|e| e / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Token 1 pushes towards weak, token 2 towards strong.
    const THREE_WAY: &str = r#"{
        "embedding": [[0, 0], [1, 0], [0, 1]],
        "dense": {
            "weights": [[4, -4], [0, 0], [-4, 4]],
            "bias": [0, 0, 0]
        }
    }"#;

    const SINGLE: &str = r#"{
        "embedding": [[0], [-3], [3]],
        "dense": { "weights": [[1]], "bias": [0] }
    }"#;

    fn argmax(row: &[f32]) -> usize {
        let mut best = 0;
        for (i, p) in row.iter().enumerate() {
            if *p > row[best] {
                best = i;
            }
        }
        best
    }

    #[test]
    fn test_three_way_distribution() {
        let network = PooledNetwork::from_json(THREE_WAY).expect("Should load");
        let out = network
            .predict(&[vec![0, 0, 1, 1], vec![0, 2, 2, 2], vec![0, 1, 2]])
            .expect("predict");
        assert_eq!(argmax(&out[0]), 0);
        assert_eq!(argmax(&out[1]), 2);
        for row in &out {
            assert_eq!(row.len(), 3);
            assert!((row.iter().sum::<f32>() - 1.0).abs() < 1e-5);
        }
        // balanced tokens give a uniform distribution
        assert!((out[2][0] - out[2][2]).abs() < 1e-6);
    }

    #[test]
    fn test_all_padding_pools_to_zero() {
        let network = PooledNetwork::from_json(SINGLE).expect("Should load");
        let out = network.predict(&[vec![0; 20]]).expect("predict");
        assert_eq!(out, vec![vec![0.5]]);
    }

    #[test]
    fn test_single_output_is_sigmoid() {
        let network = PooledNetwork::from_json(SINGLE).expect("Should load");
        let out = network.predict(&[vec![0, 2], vec![1, 1]]).expect("predict");
        assert!(out[0][0] > 0.9);
        assert!(out[1][0] < 0.1);
    }

    #[test]
    fn test_out_of_vocabulary_id_fails() {
        let network = PooledNetwork::from_json(SINGLE).expect("Should load");
        let result = network.predict(&[vec![0, 7]]);
        assert!(matches!(result, Err(BackendError::Inference(_))));
    }

    #[test]
    fn test_rejects_mismatched_shapes() {
        let ragged = r#"{ "embedding": [[0, 0], [1]], "dense": { "weights": [[1, 1]], "bias": [0] } }"#;
        assert!(matches!(
            PooledNetwork::from_json(ragged),
            Err(ArtifactError::Invalid(_))
        ));

        let two_way = r#"{ "embedding": [[0]], "dense": { "weights": [[1], [1]], "bias": [0, 0] } }"#;
        assert!(matches!(
            PooledNetwork::from_json(two_way),
            Err(ArtifactError::Invalid(_))
        ));

        let wrong_dim = r#"{ "embedding": [[0, 0]], "dense": { "weights": [[1]], "bias": [0] } }"#;
        assert!(matches!(
            PooledNetwork::from_json(wrong_dim),
            Err(ArtifactError::Invalid(_))
        ));
    }
}
