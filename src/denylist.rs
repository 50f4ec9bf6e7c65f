//! Denylist management module
//!
//! Holds the fixed set of common passwords consulted by the feature
//! extractor. The built-in list is what trained classifiers were fitted
//! against; a file-backed list can replace it at startup.

use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

use crate::error::DenylistError;

/// Built-in common passwords, lower-case.
pub const COMMON_PASSWORDS: [&str; 5] = ["password", "123456", "qwerty", "admin", "letmein"];

static BUILTIN: OnceLock<Denylist> = OnceLock::new();

/// A case-insensitive, exact-match set of common passwords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denylist {
    entries: HashSet<String>,
}

impl Denylist {
    /// The hard-coded list in [`COMMON_PASSWORDS`].
    pub fn builtin() -> Self {
        Self::from_entries(COMMON_PASSWORDS)
    }

    /// Builds a denylist from arbitrary entries. Entries are trimmed and
    /// lower-cased; blank entries are skipped.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|e| e.as_ref().trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self { entries }
    }

    /// Loads a denylist from a file with one password per line.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File does not exist
    /// - File cannot be read
    /// - File contains no entries
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DenylistError> {
        let path = path.as_ref();

        if !path.exists() {
            #[cfg(feature = "tracing")]
            tracing::error!("Denylist load FAILED: FileNotFound {:?}", path);
            return Err(DenylistError::FileNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        let denylist = Self::from_entries(content.lines());

        if denylist.is_empty() {
            #[cfg(feature = "tracing")]
            tracing::error!("Denylist load FAILED: Empty file {:?}", path);
            return Err(DenylistError::EmptyFile);
        }

        #[cfg(feature = "tracing")]
        tracing::info!("Denylist loaded: {} passwords from {:?}", denylist.len(), path);

        Ok(denylist)
    }

    /// Returns `true` if the whole password, lower-cased, is an entry.
    pub fn contains(&self, password: &str) -> bool {
        self.entries.contains(&password.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Denylist {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Shared instance of the built-in denylist.
pub fn builtin_denylist() -> &'static Denylist {
    BUILTIN.get_or_init(Denylist::builtin)
}
