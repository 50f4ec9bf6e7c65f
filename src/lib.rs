//! Password crack-time estimation library
//!
//! Estimates how resistant a password is to offline guessing. A trained
//! classifier or sequence model, when its artifacts are present at
//! startup, reports a strength label; otherwise an entropy heuristic
//! reports estimated seconds under a fixed guess rate.
//!
//! # Features
//!
//! - `async` (default): Enables channel-based estimation with cancellation support
//! - `tracing`: Enables logging via tracing crate
//!
//! # Environment Variables
//!
//! - `PWD_CLASSIFIER_PATH`: Classifier artifact
//!   (default: `password_strength_model.json` next to the executable)
//! - `PWD_SEQUENCE_MODEL_PATH`: Sequence model artifact
//!   (default: `password_strength_lstm.json`)
//! - `PWD_TOKENIZER_PATH`: Tokenizer artifact
//!   (default: `password_tokenizer.json`)
//! - `PWD_DENYLIST_PATH`: Replaces the built-in common-password list
//!
//! # Example
//!
//! ```rust,no_run
//! use crack_estimate::{init_engine, estimate_crack_time, EstimationResult};
//! use secrecy::SecretString;
//!
//! // Probe artifacts (call once at startup)
//! let engine = init_engine();
//! println!("Backend: {}", engine.backend_name());
//!
//! let password = SecretString::new("MyP@ssw0rd!".to_string().into());
//! match estimate_crack_time(&password) {
//!     EstimationResult::Seconds(s) => println!("{} seconds", s),
//!     EstimationResult::ClassLabel(label) => println!("{}", label),
//! }
//! ```

// Internal modules
mod backend;
mod config;
mod denylist;
mod engine;
mod error;
mod features;
mod heuristic;
mod probe;
mod result;

// Public API
pub use backend::{
    Classifier, DecisionForest, PooledNetwork, SEQUENCE_WINDOW, STRONG_THRESHOLD,
    ScoringBackend, SequenceBackend, SequenceModel, Tokenizer, WordIndexTokenizer,
    interpret_output, pad_sequences,
};
pub use config::{EngineConfig, install_dir};
pub use denylist::{COMMON_PASSWORDS, Denylist, builtin_denylist};
pub use engine::{Engine, estimate_crack_time, init_engine, init_engine_with};
pub use error::{ArtifactError, BackendError, DenylistError};
pub use features::{CharCategory, FEATURE_COUNT, FeatureVector, extract, extract_with};
pub use heuristic::{
    DIGIT_CHARSET, GUESSES_PER_SECOND, HeuristicEstimate, LOWER_CHARSET, SYMBOL_CHARSET,
    UPPER_CHARSET, analyze, charset_size,
};
pub use probe::{
    Availability, BackendReport, probe_classifier, probe_denylist, probe_sequence_model,
    select_backend,
};
pub use result::{EstimationResult, StrengthLabel, format_duration};

#[cfg(feature = "async")]
pub use engine::{ESTIMATE_DEBOUNCE, estimate_crack_time_tx};
