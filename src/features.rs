//! Feature extraction - converts a password into the fixed feature vector
//! consumed by trained classifiers.

use secrecy::{ExposeSecret, SecretString};

use crate::denylist::{Denylist, builtin_denylist};

/// Number of values in a [`FeatureVector`].
pub const FEATURE_COUNT: usize = 6;

/// Character category used both for feature counts and charset sizing.
///
/// Only ASCII letters and digits are classified as such; every other
/// character, including non-ASCII letters, is a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharCategory {
    Upper,
    Lower,
    Digit,
    Symbol,
}

impl CharCategory {
    pub fn of(c: char) -> Self {
        if c.is_ascii_uppercase() {
            CharCategory::Upper
        } else if c.is_ascii_lowercase() {
            CharCategory::Lower
        } else if c.is_ascii_digit() {
            CharCategory::Digit
        } else {
            CharCategory::Symbol
        }
    }
}

/// `{length, upper, lower, digit, symbol, is_common_word}` for one password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeatureVector {
    pub length: usize,
    pub upper_count: usize,
    pub lower_count: usize,
    pub digit_count: usize,
    pub symbol_count: usize,
    pub is_common_word: bool,
}

impl FeatureVector {
    pub(crate) fn from_plain(password: &str, denylist: &Denylist) -> Self {
        let mut features = FeatureVector {
            is_common_word: denylist.contains(password),
            ..Default::default()
        };

        for c in password.chars() {
            features.length += 1;
            match CharCategory::of(c) {
                CharCategory::Upper => features.upper_count += 1,
                CharCategory::Lower => features.lower_count += 1,
                CharCategory::Digit => features.digit_count += 1,
                CharCategory::Symbol => features.symbol_count += 1,
            }
        }

        features
    }

    /// Values in the order classifiers were trained on.
    pub fn as_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.length as f64,
            self.upper_count as f64,
            self.lower_count as f64,
            self.digit_count as f64,
            self.symbol_count as f64,
            if self.is_common_word { 1.0 } else { 0.0 },
        ]
    }

    /// Whether at least one character of `category` was seen.
    pub fn has(&self, category: CharCategory) -> bool {
        let count = match category {
            CharCategory::Upper => self.upper_count,
            CharCategory::Lower => self.lower_count,
            CharCategory::Digit => self.digit_count,
            CharCategory::Symbol => self.symbol_count,
        };
        count > 0
    }
}

/// Extracts features using the built-in denylist.
pub fn extract(password: &SecretString) -> FeatureVector {
    extract_with(password, builtin_denylist())
}

/// Extracts features checking `is_common_word` against `denylist`.
pub fn extract_with(password: &SecretString, denylist: &Denylist) -> FeatureVector {
    FeatureVector::from_plain(password.expose_secret(), denylist)
}
