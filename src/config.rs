//! Engine configuration - where backend artifacts live.

use std::path::{Path, PathBuf};

pub const CLASSIFIER_PATH_ENV: &str = "PWD_CLASSIFIER_PATH";
pub const SEQUENCE_MODEL_PATH_ENV: &str = "PWD_SEQUENCE_MODEL_PATH";
pub const TOKENIZER_PATH_ENV: &str = "PWD_TOKENIZER_PATH";
pub const DENYLIST_PATH_ENV: &str = "PWD_DENYLIST_PATH";

pub const CLASSIFIER_FILE: &str = "password_strength_model.json";
pub const SEQUENCE_MODEL_FILE: &str = "password_strength_lstm.json";
pub const TOKENIZER_FILE: &str = "password_tokenizer.json";

/// Artifact locations consulted once when an [`crate::Engine`] is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub classifier_path: PathBuf,
    pub sequence_model_path: PathBuf,
    pub tokenizer_path: PathBuf,
    /// Replaces the built-in denylist when set.
    pub denylist_path: Option<PathBuf>,
}

impl EngineConfig {
    /// Default artifact names inside `dir`.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            classifier_path: dir.join(CLASSIFIER_FILE),
            sequence_model_path: dir.join(SEQUENCE_MODEL_FILE),
            tokenizer_path: dir.join(TOKENIZER_FILE),
            denylist_path: None,
        }
    }

    /// Defaults next to the executable, overridden per artifact by
    ///
    /// - `PWD_CLASSIFIER_PATH`
    /// - `PWD_SEQUENCE_MODEL_PATH`
    /// - `PWD_TOKENIZER_PATH`
    /// - `PWD_DENYLIST_PATH`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            classifier_path: env_path(CLASSIFIER_PATH_ENV).unwrap_or(defaults.classifier_path),
            sequence_model_path: env_path(SEQUENCE_MODEL_PATH_ENV)
                .unwrap_or(defaults.sequence_model_path),
            tokenizer_path: env_path(TOKENIZER_PATH_ENV).unwrap_or(defaults.tokenizer_path),
            denylist_path: env_path(DENYLIST_PATH_ENV),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::in_dir(install_dir())
    }
}

/// Directory of the running executable, or `.` if it cannot be resolved.
pub fn install_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Helper to safely set env var in tests
    fn set_env(key: &str, value: &str) {
        // SAFETY: serial tests, no concurrent env access
        unsafe { std::env::set_var(key, value); }
    }

    /// Helper to safely remove env var in tests
    fn remove_env(key: &str) {
        // SAFETY: serial tests, no concurrent env access
        unsafe { std::env::remove_var(key); }
    }

    fn clear_all() {
        for key in [
            CLASSIFIER_PATH_ENV,
            SEQUENCE_MODEL_PATH_ENV,
            TOKENIZER_PATH_ENV,
            DENYLIST_PATH_ENV,
        ] {
            remove_env(key);
        }
    }

    #[test]
    fn test_in_dir_uses_default_names() {
        let config = EngineConfig::in_dir("/opt/app");
        assert_eq!(config.classifier_path, PathBuf::from("/opt/app/password_strength_model.json"));
        assert_eq!(config.sequence_model_path, PathBuf::from("/opt/app/password_strength_lstm.json"));
        assert_eq!(config.tokenizer_path, PathBuf::from("/opt/app/password_tokenizer.json"));
        assert_eq!(config.denylist_path, None);
    }

    #[test]
    #[serial]
    fn test_from_env_defaults_to_install_dir() {
        clear_all();
        let config = EngineConfig::from_env();
        assert_eq!(config, EngineConfig::in_dir(install_dir()));
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_all();
        set_env(CLASSIFIER_PATH_ENV, "/custom/forest.json");
        set_env(TOKENIZER_PATH_ENV, "/custom/tok.json");
        set_env(DENYLIST_PATH_ENV, "/custom/denylist.txt");

        let config = EngineConfig::from_env();
        assert_eq!(config.classifier_path, PathBuf::from("/custom/forest.json"));
        assert_eq!(config.tokenizer_path, PathBuf::from("/custom/tok.json"));
        assert_eq!(config.sequence_model_path, install_dir().join(SEQUENCE_MODEL_FILE));
        assert_eq!(config.denylist_path, Some(PathBuf::from("/custom/denylist.txt")));

        clear_all();
    }

    #[test]
    #[serial]
    fn test_from_env_ignores_empty_values() {
        clear_all();
        set_env(CLASSIFIER_PATH_ENV, "");
        let config = EngineConfig::from_env();
        assert_eq!(config.classifier_path, install_dir().join(CLASSIFIER_FILE));
        clear_all();
    }
}
