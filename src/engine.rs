//! Estimation engine - runs the selected backend and falls back to the
//! entropy heuristic.

use std::sync::OnceLock;

use secrecy::{ExposeSecret, SecretString};

#[cfg(feature = "async")]
use tokio::sync::mpsc;

#[cfg(feature = "async")]
use tokio_util::sync::CancellationToken;

use crate::backend::ScoringBackend;
use crate::config::EngineConfig;
use crate::denylist::Denylist;
use crate::error::BackendError;
use crate::features::FeatureVector;
use crate::heuristic;
use crate::probe::{BackendReport, probe_denylist, select_backend};
use crate::result::{EstimationResult, StrengthLabel};

static ENGINE: OnceLock<Engine> = OnceLock::new();

/// Holds the backend chosen at construction. Never mutated afterwards, so
/// one engine can be shared freely across threads.
#[derive(Debug)]
pub struct Engine {
    backend: ScoringBackend,
    denylist: Denylist,
    report: BackendReport,
}

impl Engine {
    /// Probes every artifact in `config` and keeps the highest-priority
    /// backend that loads. Never fails: anything missing or broken is
    /// recorded in [`Engine::report`] and skipped.
    pub fn from_config(config: &EngineConfig) -> Self {
        let (backend, classifier, sequence_model) = select_backend(config);
        let (denylist, denylist_state) = probe_denylist(config);

        #[cfg(feature = "tracing")]
        tracing::info!("Estimation engine ready, backend: {}", backend.name());

        Self {
            backend,
            denylist,
            report: BackendReport {
                classifier,
                sequence_model,
                denylist: denylist_state,
            },
        }
    }

    /// Uses `backend` as-is, with the built-in denylist.
    pub fn with_backend(backend: ScoringBackend) -> Self {
        let report = BackendReport::forced(&backend);
        Self {
            backend,
            denylist: Denylist::builtin(),
            report,
        }
    }

    pub fn heuristic_only() -> Self {
        Self::with_backend(ScoringBackend::Heuristic)
    }

    pub fn with_denylist(mut self, denylist: Denylist) -> Self {
        self.denylist = denylist;
        self
    }

    pub fn backend(&self) -> &ScoringBackend {
        &self.backend
    }

    /// `classifier`, `sequence-model` or `heuristic`.
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn report(&self) -> &BackendReport {
        &self.report
    }

    pub fn denylist(&self) -> &Denylist {
        &self.denylist
    }

    /// Estimates how hard `password` is to guess.
    ///
    /// Trained backends yield a [`EstimationResult::ClassLabel`]; if one
    /// fails, the call falls through to the heuristic, which yields
    /// [`EstimationResult::Seconds`]. Never panics or errors.
    pub fn estimate_crack_time(&self, password: &SecretString) -> EstimationResult {
        let pwd = password.expose_secret();
        let features = FeatureVector::from_plain(pwd, &self.denylist);

        match self.predict_label(pwd, &features) {
            Some(Ok(label)) => return EstimationResult::ClassLabel(label),
            Some(Err(_e)) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    "{} backend failed, falling back to heuristic: {}",
                    self.backend.name(),
                    _e
                );
            }
            None => {}
        }

        EstimationResult::Seconds(heuristic::estimate_seconds(&features))
    }

    fn predict_label(
        &self,
        password: &str,
        features: &FeatureVector,
    ) -> Option<Result<StrengthLabel, BackendError>> {
        match &self.backend {
            ScoringBackend::Classifier(classifier) => Some(
                classifier
                    .predict(std::slice::from_ref(features))
                    .and_then(|labels| labels.into_iter().next().ok_or(BackendError::EmptyOutput))
                    .and_then(|label| label.parse()),
            ),
            ScoringBackend::SequenceModel(sequence) => Some(sequence.predict_label(password)),
            ScoringBackend::Heuristic => None,
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::from_config(&EngineConfig::from_env())
    }
}

/// Initializes the process-wide engine from the environment.
///
/// Idempotent: later calls return the engine built by the first one.
pub fn init_engine() -> &'static Engine {
    ENGINE.get_or_init(Engine::default)
}

/// Initializes the process-wide engine from `config`.
///
/// Has no effect if the engine is already initialized.
pub fn init_engine_with(config: &EngineConfig) -> &'static Engine {
    ENGINE.get_or_init(|| Engine::from_config(config))
}

/// Estimates `password` with the process-wide engine, initializing it from
/// the environment on first use.
pub fn estimate_crack_time(password: &SecretString) -> EstimationResult {
    init_engine().estimate_crack_time(password)
}

/// Async version that sends the estimate via channel.
///
/// Waits [`ESTIMATE_DEBOUNCE`] first so rapid keystrokes can cancel
/// superseded requests; nothing is sent if `token` is cancelled before or
/// during that wait. The estimation itself never suspends.
#[cfg(feature = "async")]
pub async fn estimate_crack_time_tx(
    engine: &Engine,
    password: &SecretString,
    token: CancellationToken,
    tx: mpsc::Sender<EstimationResult>,
) {
    #[cfg(feature = "tracing")]
    tracing::info!("estimation is about to start...");

    tokio::time::sleep(ESTIMATE_DEBOUNCE).await;
    if token.is_cancelled() {
        #[cfg(feature = "tracing")]
        tracing::info!("estimation cancelled");
        return;
    }

    let estimate = engine.estimate_crack_time(password);

    if let Err(_e) = tx.send(estimate).await {
        #[cfg(feature = "tracing")]
        tracing::error!("Failed to send crack-time estimate: {}", _e);
    }
}

/// Delay before an async estimate runs.
#[cfg(feature = "async")]
pub const ESTIMATE_DEBOUNCE: std::time::Duration = std::time::Duration::from_millis(300);
