use serde::{Deserialize, Serialize};

/// Step lookup into an ordered sample sequence spread evenly across a run.
///
/// Returns `samples[floor(fraction * len)]`, i.e. the nearest earlier sample.
/// The index is clamped to the last entry so `fraction == 1.0` stays in range.
/// Returns `None` for an empty sequence.
pub fn schedule_value(samples: &[f64], fraction: f64) -> Option<f64> {
    let last = samples.len().checked_sub(1)?;
    let idx = (fraction.max(0.0) * samples.len() as f64).floor() as usize;
    Some(samples[idx.min(last)])
}

/// Fractional brightness levels (0..1) of a light source over the run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrightnessSchedule {
    levels: Vec<f64>,
}

impl BrightnessSchedule {
    pub fn new(levels: Vec<f64>) -> Self {
        Self { levels }
    }

    /// Constant brightness for the whole run
    pub fn constant(level: f64) -> Self {
        Self {
            levels: vec![level],
        }
    }

    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    /// Brightness level at an elapsed-time fraction. An empty schedule is dark.
    pub fn level_at(&self, fraction: f64) -> f64 {
        schedule_value(&self.levels, fraction).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_value_steps() {
        let samples = [0.5, 1.0];
        assert_eq!(schedule_value(&samples, 0.0), Some(0.5));
        assert_eq!(schedule_value(&samples, 0.49), Some(0.5));
        assert_eq!(schedule_value(&samples, 0.5), Some(1.0));
        assert_eq!(schedule_value(&samples, 0.99), Some(1.0));
    }

    #[test]
    fn test_schedule_value_clamps_at_end() {
        let samples = [0.1, 0.2, 0.3];
        assert_eq!(schedule_value(&samples, 1.0), Some(0.3));
        assert_eq!(schedule_value(&samples, 1.5), Some(0.3));
    }

    #[test]
    fn test_schedule_value_empty() {
        assert_eq!(schedule_value(&[], 0.3), None);
        assert_eq!(BrightnessSchedule::new(Vec::new()).level_at(0.3), 0.0);
    }

    #[test]
    fn test_constant_schedule() {
        let schedule = BrightnessSchedule::constant(0.75);
        for f in [0.0, 0.25, 0.5, 0.999, 1.0] {
            assert_eq!(schedule.level_at(f), 0.75);
        }
    }
}
