//! Estimation results and their human-readable rendering.

use std::fmt;
use std::str::FromStr;

use crate::error::BackendError;

const MINUTE: f64 = 60.0;
const HOUR: f64 = 3_600.0;
const DAY: f64 = 86_400.0;
const YEAR: f64 = 31_536_000.0;

/// Categorical strength reported by trained backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrengthLabel {
    Weak,
    Medium,
    Strong,
}

impl StrengthLabel {
    /// Labels indexed by class position of a three-way output.
    pub const ALL: [StrengthLabel; 3] = [
        StrengthLabel::Weak,
        StrengthLabel::Medium,
        StrengthLabel::Strong,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrengthLabel::Weak => "weak",
            StrengthLabel::Medium => "medium",
            StrengthLabel::Strong => "strong",
        }
    }
}

impl fmt::Display for StrengthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrengthLabel {
    type Err = BackendError;

    /// Accepts exactly `weak`, `medium` or `strong`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weak" => Ok(StrengthLabel::Weak),
            "medium" => Ok(StrengthLabel::Medium),
            "strong" => Ok(StrengthLabel::Strong),
            other => Err(BackendError::UnknownLabel(other.to_string())),
        }
    }
}

/// Outcome of one estimation call.
///
/// `Seconds` comes from the entropy heuristic, `ClassLabel` from a
/// trained backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EstimationResult {
    Seconds(f64),
    ClassLabel(StrengthLabel),
}

impl EstimationResult {
    pub fn seconds(&self) -> Option<f64> {
        match self {
            EstimationResult::Seconds(s) => Some(*s),
            EstimationResult::ClassLabel(_) => None,
        }
    }

    pub fn label(&self) -> Option<StrengthLabel> {
        match self {
            EstimationResult::Seconds(_) => None,
            EstimationResult::ClassLabel(l) => Some(*l),
        }
    }
}

impl fmt::Display for EstimationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstimationResult::Seconds(s) => {
                write!(f, "Estimated crack time: {}", format_duration(*s))
            }
            EstimationResult::ClassLabel(l) => write!(f, "Password strength: {}", l),
        }
    }
}

/// Renders seconds in the largest unit below it, up to years.
pub fn format_duration(seconds: f64) -> String {
    if seconds < MINUTE {
        format!("{:.2} seconds", seconds)
    } else if seconds < HOUR {
        format!("{:.2} minutes", seconds / MINUTE)
    } else if seconds < DAY {
        format!("{:.2} hours", seconds / HOUR)
    } else if seconds < YEAR {
        format!("{:.2} days", seconds / DAY)
    } else {
        format!("{:.2} years", seconds / YEAR)
    }
}
