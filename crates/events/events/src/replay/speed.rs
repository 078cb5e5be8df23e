use crate::{ReplayError, ReplayResult};
use std::time::Duration;

/// Speed control for event replay
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ReplaySpeed {
    /// Replay as fast as possible, skipping every delay
    Fast,

    /// Preserve original timing between events
    #[default]
    RealTime,

    /// Custom speed multiplier (2.0 = 2x speed, 0.5 = half speed)
    ///
    /// A multiplier that is not finite and positive paces in real time.
    /// [`ReplaySpeed::from_options`] rejects such values up front.
    Custom(f64),
}

impl ReplaySpeed {
    /// Build a speed from a speed factor and the fast-mode flag
    ///
    /// The factor must be finite and positive even when fast mode makes it
    /// irrelevant, so a bad value is reported instead of silently ignored.
    pub fn from_options(speed_factor: f64, fast_mode: bool) -> ReplayResult<Self> {
        if !speed_factor.is_finite() || speed_factor <= 0.0 {
            return Err(ReplayError::InvalidConfig(format!(
                "speed factor must be a positive number, got {}",
                speed_factor
            )));
        }

        Ok(if fast_mode {
            ReplaySpeed::Fast
        } else if speed_factor == 1.0 {
            ReplaySpeed::RealTime
        } else {
            ReplaySpeed::Custom(speed_factor)
        })
    }

    /// The divisor applied to timestamp deltas, or `None` in fast mode
    pub fn factor(&self) -> Option<f64> {
        match *self {
            ReplaySpeed::Fast => None,
            ReplaySpeed::RealTime => Some(1.0),
            ReplaySpeed::Custom(multiplier) if multiplier.is_finite() && multiplier > 0.0 => {
                Some(multiplier)
            }
            ReplaySpeed::Custom(_) => Some(1.0),
        }
    }

    /// Whether pacing is skipped entirely
    pub fn is_fast(&self) -> bool {
        self.factor().is_none()
    }

    /// How long to wait before dispatching an event at `current` seconds when
    /// the previous one was at `previous` seconds
    ///
    /// Returns `None` when no wait is needed: in fast mode, and when the
    /// scaled delta is zero or negative (out-of-order input).
    pub fn delay_between(&self, previous: f64, current: f64) -> Option<Duration> {
        let factor = self.factor()?;
        let seconds = (current - previous) / factor;
        if seconds > 0.0 {
            Duration::try_from_secs_f64(seconds).ok()
        } else {
            None
        }
    }
}
