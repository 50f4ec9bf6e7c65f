//! Decision forest classifier loaded from a JSON artifact.

use std::path::Path;

use serde::Deserialize;

use super::Classifier;
use crate::error::{ArtifactError, BackendError};
use crate::features::{FEATURE_COUNT, FeatureVector};

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Node {
    Leaf {
        leaf: Vec<f64>,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// An ensemble of decision trees voting on a class label.
///
/// Each tree routes a feature row left when `x[feature] <= threshold`
/// and ends in a leaf of per-class sample counts. The forest averages the
/// normalized leaves and picks the highest class, the first one on ties.
#[derive(Debug, Clone, Deserialize)]
pub struct DecisionForest {
    classes: Vec<String>,
    trees: Vec<Node>,
}

impl DecisionForest {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ArtifactError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, ArtifactError> {
        let forest: DecisionForest = serde_json::from_str(json)?;
        forest.validate()?;
        Ok(forest)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    fn validate(&self) -> Result<(), ArtifactError> {
        if self.classes.is_empty() {
            return Err(ArtifactError::Invalid("forest has no classes".to_string()));
        }
        if self.trees.is_empty() {
            return Err(ArtifactError::Invalid("forest has no trees".to_string()));
        }

        let mut stack: Vec<&Node> = self.trees.iter().collect();
        while let Some(node) = stack.pop() {
            match node {
                Node::Leaf { leaf } => {
                    if leaf.len() != self.classes.len() {
                        return Err(ArtifactError::Invalid(format!(
                            "leaf has {} values for {} classes",
                            leaf.len(),
                            self.classes.len()
                        )));
                    }
                    if leaf.iter().any(|v| !v.is_finite() || *v < 0.0) {
                        return Err(ArtifactError::Invalid(
                            "leaf values must be finite and non-negative".to_string(),
                        ));
                    }
                    if leaf.iter().sum::<f64>() <= 0.0 {
                        return Err(ArtifactError::Invalid("leaf is empty".to_string()));
                    }
                }
                Node::Split {
                    feature,
                    left,
                    right,
                    ..
                } => {
                    if *feature >= FEATURE_COUNT {
                        return Err(ArtifactError::Invalid(format!(
                            "split on feature {} of {}",
                            feature, FEATURE_COUNT
                        )));
                    }
                    stack.push(left);
                    stack.push(right);
                }
            }
        }
        Ok(())
    }

    fn vote(&self, row: &[f64; FEATURE_COUNT]) -> usize {
        let mut totals = vec![0.0; self.classes.len()];

        for tree in &self.trees {
            let mut node = tree;
            let leaf = loop {
                match node {
                    Node::Leaf { leaf } => break leaf,
                    Node::Split {
                        feature,
                        threshold,
                        left,
                        right,
                    } => {
                        node = if row[*feature] <= *threshold {
                            left.as_ref()
                        } else {
                            right.as_ref()
                        };
                    }
                }
            };
            let sum: f64 = leaf.iter().sum();
            for (total, count) in totals.iter_mut().zip(leaf) {
                *total += count / sum;
            }
        }

        let mut best = 0;
        for (i, total) in totals.iter().enumerate().skip(1) {
            if *total > totals[best] {
                best = i;
            }
        }
        best
    }
}

impl Classifier for DecisionForest {
    fn predict(&self, batch: &[FeatureVector]) -> Result<Vec<String>, BackendError> {
        Ok(batch
            .iter()
            .map(|features| self.classes[self.vote(&features.as_array())].clone())
            .collect())
    }
}
