use super::error::ClockConfigError;
use super::timer::DEFAULT_TIME_CAP;

/// Clock configuration.
///
/// `time_cap` is handed to every timer the clock creates, including the
/// built-in one. A tick that advances logical time by more than the cap is
/// treated as a stall: pending events keep their remaining delay instead of
/// all firing at once. `None` disables the check.
#[derive(Debug, Clone, PartialEq)]
pub struct ClockConfig {
    pub time_scale: f64,
    pub paused: bool,
    pub time_cap: Option<f64>,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            paused: false,
            time_cap: Some(DEFAULT_TIME_CAP),
        }
    }
}

impl ClockConfig {
    pub fn validate(&self) -> Result<(), ClockConfigError> {
        if !self.time_scale.is_finite() || self.time_scale < 0.0 {
            return Err(ClockConfigError::InvalidTimeScale(self.time_scale));
        }
        if let Some(cap) = self.time_cap {
            if !cap.is_finite() || cap <= 0.0 {
                return Err(ClockConfigError::InvalidTimeCap(cap));
            }
        }
        Ok(())
    }
}
