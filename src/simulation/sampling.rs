//! # Adaptive Sampling Policy
//!
//! Decides, per simulated second, whether sensors are polled. Sensors are
//! sampled on a fixed period. Within a short timeout window after each
//! scheduled sample, a large tracking error triggers corrective re-samples;
//! battery sensors only join those unless call/response is supported.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

/// What to do at one simulated second
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
pub enum SampleAction {
    /// Poll every sensor, then update the controller
    Full,
    /// Poll wired sensors only, then update the controller
    Partial,
    /// No measurement and no controller update
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingPolicy {
    /// Scheduled sampling period (seconds, >= 1)
    pub measure_period_s: u64,
    /// Length of the retry window after each scheduled sample (seconds)
    pub timeout_s: u64,
    /// Error magnitude (fraction of max lux) above which a retry is attempted
    pub error_threshold: f64,
    /// Battery sensors answer on-demand polls
    pub use_battery_response: bool,
}

impl Default for SamplingPolicy {
    fn default() -> Self {
        Self {
            measure_period_s: 60,
            timeout_s: 10,
            error_threshold: 0.001,
            use_battery_response: false,
        }
    }
}

impl SamplingPolicy {
    pub fn decide(&self, s: u64, last_error: f64) -> SampleAction {
        let phase = s % self.measure_period_s.max(1);
        if phase == 0 {
            SampleAction::Full
        } else if phase < self.timeout_s && last_error.abs() > self.error_threshold {
            if self.use_battery_response {
                SampleAction::Full
            } else {
                SampleAction::Partial
            }
        } else {
            SampleAction::Skip
        }
    }
}

/// Reference trajectory: an ordered list of fractions, each held for an equal
/// share of the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSchedule {
    references: Vec<f64>,
    /// `ceil(duration / len)` seconds per reference
    period_s: u64,
    next_idx: usize,
}

impl ReferenceSchedule {
    pub fn new(references: Vec<f64>, duration_s: u64) -> Self {
        let count = references.len().max(1) as u64;
        Self {
            period_s: duration_s.div_ceil(count).max(1),
            references,
            next_idx: 0,
        }
    }

    pub fn period_s(&self) -> u64 {
        self.period_s
    }

    /// Next reference when step `s` starts a new period.
    ///
    /// The index stops at the last reference, so it never runs past the end.
    pub fn advance(&mut self, s: u64) -> Option<f64> {
        if s % self.period_s != 0 {
            return None;
        }
        let last = self.references.len().checked_sub(1)?;
        let value = self.references[self.next_idx.min(last)];
        self.next_idx += 1;
        Some(value)
    }
}
