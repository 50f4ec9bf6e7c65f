//! Scoring backends
//!
//! Trained backends are black boxes behind small capability traits. Each
//! has one concrete, JSON-loaded implementation in a submodule; hosts may
//! plug in their own through [`ScoringBackend`].

mod forest;
mod network;
mod tokenizer;

use std::fmt;

pub use forest::DecisionForest;
pub use network::PooledNetwork;
pub use tokenizer::WordIndexTokenizer;

use crate::error::BackendError;
use crate::features::FeatureVector;
use crate::result::StrengthLabel;

/// Fixed token window fed to sequence models.
pub const SEQUENCE_WINDOW: usize = 20;

/// Probability above which a single-output model reports `strong`.
pub const STRONG_THRESHOLD: f32 = 0.5;

/// A trained classifier over [`FeatureVector`]s.
pub trait Classifier: Send + Sync {
    /// Predicts one raw label per input row.
    fn predict(&self, batch: &[FeatureVector]) -> Result<Vec<String>, BackendError>;
}

/// Maps text to integer token sequences. Id `0` is reserved for padding.
pub trait Tokenizer: Send + Sync {
    fn texts_to_sequences(&self, texts: &[&str]) -> Vec<Vec<u32>>;
}

/// A trained network over padded token sequences.
pub trait SequenceModel: Send + Sync {
    /// Returns one probability row per input sequence.
    fn predict(&self, batch: &[Vec<u32>]) -> Result<Vec<Vec<f32>>, BackendError>;
}

/// A sequence model together with the tokenizer it was trained with.
pub struct SequenceBackend {
    model: Box<dyn SequenceModel>,
    tokenizer: Box<dyn Tokenizer>,
}

impl SequenceBackend {
    pub fn new(model: Box<dyn SequenceModel>, tokenizer: Box<dyn Tokenizer>) -> Self {
        Self { model, tokenizer }
    }

    /// Tokenizes, pads to [`SEQUENCE_WINDOW`] and classifies one password.
    pub fn predict_label(&self, password: &str) -> Result<StrengthLabel, BackendError> {
        let sequences = self.tokenizer.texts_to_sequences(&[password]);
        let padded = pad_sequences(&sequences, SEQUENCE_WINDOW);
        let output = self.model.predict(&padded)?;
        let row = output.first().ok_or(BackendError::EmptyOutput)?;
        interpret_output(row)
    }
}

/// The backend selected for an engine's lifetime.
pub enum ScoringBackend {
    Classifier(Box<dyn Classifier>),
    SequenceModel(SequenceBackend),
    Heuristic,
}

impl ScoringBackend {
    pub fn name(&self) -> &'static str {
        match self {
            ScoringBackend::Classifier(_) => "classifier",
            ScoringBackend::SequenceModel(_) => "sequence-model",
            ScoringBackend::Heuristic => "heuristic",
        }
    }

    pub fn is_trained(&self) -> bool {
        !matches!(self, ScoringBackend::Heuristic)
    }
}

impl fmt::Debug for ScoringBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ScoringBackend").field(&self.name()).finish()
    }
}

/// Pads or truncates every sequence to `maxlen`, keeping the tail and
/// filling the front with `0`.
pub fn pad_sequences(sequences: &[Vec<u32>], maxlen: usize) -> Vec<Vec<u32>> {
    sequences
        .iter()
        .map(|seq| {
            let tail = &seq[seq.len().saturating_sub(maxlen)..];
            let mut padded = vec![0; maxlen - tail.len()];
            padded.extend_from_slice(tail);
            padded
        })
        .collect()
}

/// Reads a label out of one model output row.
///
/// A single value is a probability of `strong`; three values are a
/// distribution over weak/medium/strong, ties going to the lower index.
pub fn interpret_output(row: &[f32]) -> Result<StrengthLabel, BackendError> {
    if row.is_empty() {
        return Err(BackendError::EmptyOutput);
    }
    if row.iter().any(|p| p.is_nan()) {
        return Err(BackendError::Inference("model produced NaN".to_string()));
    }

    match row.len() {
        1 => Ok(if row[0] > STRONG_THRESHOLD {
            StrengthLabel::Strong
        } else {
            StrengthLabel::Weak
        }),
        3 => {
            let mut best = 0;
            for (i, p) in row.iter().enumerate().skip(1) {
                if *p > row[best] {
                    best = i;
                }
            }
            Ok(StrengthLabel::ALL[best])
        }
        width => Err(BackendError::UnexpectedOutput { width }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedModel(Vec<f32>);

    impl SequenceModel for FixedModel {
        fn predict(&self, batch: &[Vec<u32>]) -> Result<Vec<Vec<f32>>, BackendError> {
            assert!(batch.iter().all(|s| s.len() == SEQUENCE_WINDOW));
            Ok(batch.iter().map(|_| self.0.clone()).collect())
        }
    }

    struct CharCodes;

    impl Tokenizer for CharCodes {
        fn texts_to_sequences(&self, texts: &[&str]) -> Vec<Vec<u32>> {
            texts.iter().map(|t| t.chars().map(u32::from).collect()).collect()
        }
    }

    #[test]
    fn test_pad_sequences_pre_pads() {
        let padded = pad_sequences(&[vec![5, 6, 7]], 5);
        assert_eq!(padded, vec![vec![0, 0, 5, 6, 7]]);
    }

    #[test]
    fn test_pad_sequences_pre_truncates() {
        let long: Vec<u32> = (1..=25).collect();
        let padded = pad_sequences(&[long], SEQUENCE_WINDOW);
        assert_eq!(padded[0].len(), SEQUENCE_WINDOW);
        assert_eq!(padded[0][0], 6);
        assert_eq!(padded[0][19], 25);
    }

    #[test]
    fn test_pad_sequences_empty_sequence() {
        let padded = pad_sequences(&[vec![]], 4);
        assert_eq!(padded, vec![vec![0, 0, 0, 0]]);
    }

    #[test]
    fn test_interpret_single_probability() {
        assert_eq!(interpret_output(&[0.51]), Ok(StrengthLabel::Strong));
        assert_eq!(interpret_output(&[0.5]), Ok(StrengthLabel::Weak));
        assert_eq!(interpret_output(&[0.1]), Ok(StrengthLabel::Weak));
    }

    #[test]
    fn test_interpret_distribution() {
        assert_eq!(interpret_output(&[0.7, 0.2, 0.1]), Ok(StrengthLabel::Weak));
        assert_eq!(interpret_output(&[0.2, 0.7, 0.1]), Ok(StrengthLabel::Medium));
        assert_eq!(interpret_output(&[0.1, 0.2, 0.7]), Ok(StrengthLabel::Strong));
    }

    #[test]
    fn test_interpret_distribution_ties_go_low() {
        assert_eq!(interpret_output(&[0.4, 0.4, 0.2]), Ok(StrengthLabel::Weak));
        assert_eq!(interpret_output(&[0.2, 0.4, 0.4]), Ok(StrengthLabel::Medium));
        assert_eq!(interpret_output(&[0.4, 0.2, 0.4]), Ok(StrengthLabel::Weak));
    }

    #[test]
    fn test_interpret_rejects_bad_rows() {
        assert_eq!(interpret_output(&[]), Err(BackendError::EmptyOutput));
        assert_eq!(
            interpret_output(&[0.5, 0.5]),
            Err(BackendError::UnexpectedOutput { width: 2 })
        );
        assert!(matches!(
            interpret_output(&[f32::NAN]),
            Err(BackendError::Inference(_))
        ));
    }

    #[test]
    fn test_sequence_backend_predict_label() {
        let backend = SequenceBackend::new(
            Box::new(FixedModel(vec![0.1, 0.8, 0.1])),
            Box::new(CharCodes),
        );
        assert_eq!(
            backend.predict_label("a very long password beyond the window"),
            Ok(StrengthLabel::Medium)
        );
    }

    #[test]
    fn test_backend_names() {
        assert_eq!(ScoringBackend::Heuristic.name(), "heuristic");
        assert!(!ScoringBackend::Heuristic.is_trained());
        let seq = ScoringBackend::SequenceModel(SequenceBackend::new(
            Box::new(FixedModel(vec![0.9])),
            Box::new(CharCodes),
        ));
        assert_eq!(seq.name(), "sequence-model");
        assert!(seq.is_trained());
        assert_eq!(format!("{:?}", seq), "ScoringBackend(\"sequence-model\")");
    }
}
