//! Backend probing - loads optional artifacts once and records why any
//! backend is unavailable.

use std::fmt;

use crate::backend::{
    Classifier, DecisionForest, PooledNetwork, ScoringBackend, SequenceBackend,
    WordIndexTokenizer,
};
use crate::config::EngineConfig;
use crate::denylist::Denylist;
use crate::error::ArtifactError;

/// Outcome of probing one optional component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    Loaded,
    /// Not probed: a higher-priority backend, or the built-in default, is in use.
    Skipped,
    Unavailable(String),
}

impl Availability {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Availability::Loaded)
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Availability::Loaded => f.write_str("loaded"),
            Availability::Skipped => f.write_str("skipped"),
            Availability::Unavailable(reason) => write!(f, "unavailable ({})", reason),
        }
    }
}

/// Diagnostics recorded while building an engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendReport {
    pub classifier: Availability,
    pub sequence_model: Availability,
    pub denylist: Availability,
}

impl BackendReport {
    pub(crate) fn forced(backend: &ScoringBackend) -> Self {
        let state = |loaded: bool| {
            if loaded {
                Availability::Loaded
            } else {
                Availability::Skipped
            }
        };
        Self {
            classifier: state(matches!(backend, ScoringBackend::Classifier(_))),
            sequence_model: state(matches!(backend, ScoringBackend::SequenceModel(_))),
            denylist: Availability::Skipped,
        }
    }
}

/// Loads the classifier artifact.
pub fn probe_classifier(config: &EngineConfig) -> Result<Box<dyn Classifier>, ArtifactError> {
    let forest = DecisionForest::from_path(&config.classifier_path)?;
    Ok(Box::new(forest))
}

/// Loads the sequence model and its tokenizer. Both files must exist
/// before either is read.
pub fn probe_sequence_model(config: &EngineConfig) -> Result<SequenceBackend, ArtifactError> {
    let model_exists = config.sequence_model_path.exists();
    let tokenizer_exists = config.tokenizer_path.exists();

    match (model_exists, tokenizer_exists) {
        (false, false) => {
            return Err(ArtifactError::NotFound(config.sequence_model_path.clone()));
        }
        (false, true) => {
            return Err(ArtifactError::IncompletePair {
                missing: config.sequence_model_path.clone(),
            });
        }
        (true, false) => {
            return Err(ArtifactError::IncompletePair {
                missing: config.tokenizer_path.clone(),
            });
        }
        (true, true) => {}
    }

    let model = PooledNetwork::from_path(&config.sequence_model_path)?;
    let tokenizer = WordIndexTokenizer::from_path(&config.tokenizer_path)?;

    if tokenizer.max_emitted_id() as usize >= model.vocab_size() {
        return Err(ArtifactError::Invalid(format!(
            "tokenizer emits ids up to {} but model vocabulary is {}",
            tokenizer.max_emitted_id(),
            model.vocab_size()
        )));
    }

    Ok(SequenceBackend::new(Box::new(model), Box::new(tokenizer)))
}

/// Loads the configured denylist, or the built-in one when none is set.
/// A broken file falls back to the built-in list.
pub fn probe_denylist(config: &EngineConfig) -> (Denylist, Availability) {
    let Some(path) = &config.denylist_path else {
        return (Denylist::builtin(), Availability::Skipped);
    };

    match Denylist::from_path(path) {
        Ok(denylist) => (denylist, Availability::Loaded),
        Err(e) => {
            #[cfg(feature = "tracing")]
            tracing::warn!("Denylist unavailable, using built-in list: {}", e);
            (Denylist::builtin(), Availability::Unavailable(e.to_string()))
        }
    }
}

/// Picks the highest-priority backend whose artifacts load.
pub fn select_backend(config: &EngineConfig) -> (ScoringBackend, Availability, Availability) {
    let classifier_error = match probe_classifier(config) {
        Ok(classifier) => {
            #[cfg(feature = "tracing")]
            tracing::info!("Classifier backend loaded from {:?}", config.classifier_path);
            return (
                ScoringBackend::Classifier(classifier),
                Availability::Loaded,
                Availability::Skipped,
            );
        }
        Err(e) => {
            #[cfg(feature = "tracing")]
            tracing::info!("Classifier backend unavailable: {}", e);
            e
        }
    };
    let classifier = Availability::Unavailable(classifier_error.to_string());

    match probe_sequence_model(config) {
        Ok(sequence) => {
            #[cfg(feature = "tracing")]
            tracing::info!(
                "Sequence-model backend loaded from {:?} and {:?}",
                config.sequence_model_path,
                config.tokenizer_path
            );
            (
                ScoringBackend::SequenceModel(sequence),
                classifier,
                Availability::Loaded,
            )
        }
        Err(e) => {
            #[cfg(feature = "tracing")]
            tracing::info!("Sequence-model backend unavailable: {}", e);
            (
                ScoringBackend::Heuristic,
                classifier,
                Availability::Unavailable(e.to_string()),
            )
        }
    }
}
