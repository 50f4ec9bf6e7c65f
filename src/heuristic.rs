//! Entropy heuristic - the terminal fallback backend.
//!
//! Brute-force estimate over the character classes observed in the
//! password, under a fixed guess rate.

use crate::features::{CharCategory, FeatureVector};

/// Assumed offline guess rate, guesses per second.
pub const GUESSES_PER_SECOND: f64 = 1e9;

/// Assumed cardinality of the lowercase alphabet.
pub const LOWER_CHARSET: u32 = 26;
/// Assumed cardinality of the uppercase alphabet.
pub const UPPER_CHARSET: u32 = 26;
/// Assumed cardinality of the digit set.
pub const DIGIT_CHARSET: u32 = 10;
/// Assumed cardinality of everything else.
pub const SYMBOL_CHARSET: u32 = 32;

/// Intermediate values of one heuristic estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicEstimate {
    pub charset: u32,
    pub entropy_bits: f64,
    pub guesses: f64,
    pub seconds: f64,
}

/// Effective charset size: the sum of the sizes of every category present.
pub fn charset_size(features: &FeatureVector) -> u32 {
    [
        (CharCategory::Lower, LOWER_CHARSET),
        (CharCategory::Upper, UPPER_CHARSET),
        (CharCategory::Digit, DIGIT_CHARSET),
        (CharCategory::Symbol, SYMBOL_CHARSET),
    ]
    .iter()
    .filter(|(category, _)| features.has(*category))
    .map(|(_, size)| size)
    .sum()
}

/// Runs the heuristic. An empty password has charset 0 and zero seconds.
///
/// Results too large for `f64` saturate at `f64::MAX`. Past roughly 1024
/// bits of entropy (about 157 characters at charset 94) longer passwords
/// therefore no longer estimate strictly slower, only equal.
pub fn analyze(features: &FeatureVector) -> HeuristicEstimate {
    let charset = charset_size(features);
    if charset == 0 {
        return HeuristicEstimate {
            charset,
            entropy_bits: 0.0,
            guesses: 0.0,
            seconds: 0.0,
        };
    }

    let entropy_bits = features.length as f64 * f64::from(charset).log2();
    let guesses = 2f64.powf(entropy_bits);
    let seconds = guesses / GUESSES_PER_SECOND;

    HeuristicEstimate {
        charset,
        entropy_bits,
        guesses: guesses.min(f64::MAX),
        seconds: seconds.min(f64::MAX),
    }
}

/// Estimated seconds to brute-force a password with these features.
pub fn estimate_seconds(features: &FeatureVector) -> f64 {
    analyze(features).seconds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::denylist::Denylist;

    fn features(s: &str) -> FeatureVector {
        FeatureVector::from_plain(s, &Denylist::builtin())
    }

    fn assert_close(actual: f64, expected: f64) {
        let tolerance = expected.abs() * 1e-9;
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_empty_password_is_zero() {
        let estimate = analyze(&features(""));
        assert_eq!(estimate.charset, 0);
        assert_eq!(estimate.seconds, 0.0);
    }

    #[test]
    fn test_six_lowercase() {
        let estimate = analyze(&features("aaaaaa"));
        assert_eq!(estimate.charset, 26);
        assert_close(estimate.entropy_bits, 6.0 * 26f64.log2());
        assert!((estimate.entropy_bits - 28.20).abs() < 0.01);
        assert_close(estimate.guesses, 308_915_776.0);
        assert_close(estimate.seconds, 0.308_915_776);
    }

    #[test]
    fn test_all_four_categories() {
        let estimate = analyze(&features("Aa1!Aa1!"));
        assert_eq!(estimate.charset, 94);
        assert!((estimate.entropy_bits - 52.44).abs() < 0.01);
        assert_close(estimate.guesses, 94f64.powi(8));
        assert_close(estimate.seconds, 94f64.powi(8) / 1e9);
    }

    #[test]
    fn test_charset_sizes_per_category() {
        assert_eq!(charset_size(&features("abc")), 26);
        assert_eq!(charset_size(&features("ABC")), 26);
        assert_eq!(charset_size(&features("123")), 10);
        assert_eq!(charset_size(&features("!@#")), 32);
        assert_eq!(charset_size(&features("aB")), 52);
        assert_eq!(charset_size(&features("a1")), 36);
        assert_eq!(charset_size(&features("ü")), 32);
    }

    #[test]
    fn test_adding_category_never_decreases() {
        let base = ["aaaaaaaa", "11111111", "AAAAAAAA", "!!!!!!!!"];
        let replacements = ['a', '1', 'A', '!'];
        for pwd in base {
            let before = estimate_seconds(&features(pwd));
            for r in replacements {
                let mut changed: Vec<char> = pwd.chars().collect();
                changed[0] = r;
                let changed: String = changed.into_iter().collect();
                let f = features(&changed);
                if charset_size(&f) > charset_size(&features(pwd)) {
                    assert!(estimate_seconds(&f) >= before, "{pwd} -> {changed}");
                }
            }
        }
    }

    #[test]
    fn test_longer_is_strictly_slower() {
        for unit in ["a", "A1", "a!", "Aa1!"] {
            let mut previous = estimate_seconds(&features(unit));
            for n in 2..10 {
                let current = estimate_seconds(&features(&unit.repeat(n)));
                assert!(current > previous, "{unit} x {n}");
                previous = current;
            }
        }
    }

    #[test]
    fn test_huge_password_saturates() {
        let estimate = analyze(&features(&"Aa1!".repeat(200)));
        assert!(estimate.seconds.is_finite());
        assert_eq!(estimate.seconds, f64::MAX);

        let longer = analyze(&features(&"Aa1!".repeat(201)));
        assert_eq!(longer.seconds, estimate.seconds);
    }
}
