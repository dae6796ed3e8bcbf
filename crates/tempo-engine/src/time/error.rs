use std::fmt;

/// Rejected [`ClockConfig`](super::ClockConfig) value.
#[derive(Debug, Clone, PartialEq)]
pub enum ClockConfigError {
    /// `time_scale` must be finite and non-negative.
    InvalidTimeScale(f64),
    /// `time_cap` must be finite and strictly positive.
    InvalidTimeCap(f64),
}

impl fmt::Display for ClockConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTimeScale(v) => {
                write!(f, "invalid clock time scale {v}: expected a finite value >= 0")
            }
            Self::InvalidTimeCap(v) => {
                write!(f, "invalid timer time cap {v}: expected a finite value > 0")
            }
        }
    }
}

impl std::error::Error for ClockConfigError {}
