//! # Outdoor Environment Model
//!
//! Computes outdoor sunlight illuminance for a simulated second from a
//! half-cosine diurnal curve, a smoothly interpolated cloud-cover profile and a
//! constant light-pollution floor.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Half of a day in seconds; the diurnal curve peaks at this time of day.
pub const HALF_DAY_SECONDS: f64 = 43_200.0;

/// Raised-cosine ease curve on `[0, 1]`, zero slope at both ends
pub fn cos_curve(u: f64) -> f64 {
    (1.0 - (PI * u).cos()) / 2.0
}

/// Cloud cover at an elapsed-time fraction.
///
/// The `N + 1` samples are spread evenly over the run; values between two
/// samples are eased with [`cos_curve`] so the profile has no kinks. Indices are
/// clamped to the last sample. An empty sequence means a clear sky.
pub fn cloud_cover(fraction: f64, clouds: &[f64]) -> f64 {
    let Some(last) = clouds.len().checked_sub(1) else {
        return 0.0;
    };
    let position = fraction.max(0.0) * last as f64;
    let floor_idx = (position.floor() as usize).min(last);
    let ceil_idx = (position.ceil() as usize).min(last);
    let u = position - floor_idx as f64;
    let low = clouds[floor_idx];
    let high = clouds[ceil_idx];
    low + cos_curve(u.clamp(0.0, 1.0)) * (high - low)
}

/// Outdoor illuminance in lux at absolute simulated second-of-day `t`.
///
/// `t` is not wrapped at midnight; the curve is periodic over a day anyway.
pub fn sunlight(t: f64, max_sun: f64, cloud_cover: f64, light_pollution: f64, sunset: f64) -> f64 {
    let sun = (sunset - max_sun) * (PI * t / HALF_DAY_SECONDS).cos() + sunset;
    ((1.0 - cloud_cover) * sun).max(0.0) + light_pollution
}

/// Scalar outdoor parameters for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentParameters {
    /// Clear-sky illuminance at solar noon (lux)
    pub max_sun_lux: f64,
    /// Illuminance that is always present, day or night (lux)
    pub light_pollution_lux: f64,
    /// Illuminance at sunrise/sunset (lux)
    pub sunset_lux: f64,
    /// Cloud-cover fractions (0..1) spread across the run
    pub cloud_cover: Vec<f64>,
    /// Simulated start time of day (seconds)
    pub start_time_s: u64,
    /// Number of simulated seconds
    pub duration_s: u64,
}

impl Default for EnvironmentParameters {
    fn default() -> Self {
        Self {
            max_sun_lux: 15_000.0,
            light_pollution_lux: 500.0,
            sunset_lux: 400.0,
            cloud_cover: vec![0.0, 0.3, 0.15],
            start_time_s: 6 * 3600,
            duration_s: 12 * 3600 + 1,
        }
    }
}

/// Outdoor conditions at a single simulated second
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutdoorConditions {
    /// Absolute simulated second of day
    pub time_s: u64,
    /// Elapsed fraction of the run in `[0, 1)`
    pub fraction: f64,
    pub cloud_cover: f64,
    pub sunlight_lux: f64,
}

/// Outdoor sunlight model for one run
#[derive(Debug, Clone)]
pub struct EnvironmentModel {
    params: EnvironmentParameters,
}

impl EnvironmentModel {
    pub fn new(params: EnvironmentParameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &EnvironmentParameters {
        &self.params
    }

    pub fn duration_s(&self) -> u64 {
        self.params.duration_s
    }

    /// Elapsed fraction of the run at step `s`
    pub fn fraction(&self, s: u64) -> f64 {
        if self.params.duration_s == 0 {
            return 0.0;
        }
        s as f64 / self.params.duration_s as f64
    }

    /// Outdoor conditions at step `s` (seconds since run start)
    pub fn at(&self, s: u64) -> OutdoorConditions {
        let fraction = self.fraction(s);
        let time_s = self.params.start_time_s + s;
        let cloud = cloud_cover(fraction, &self.params.cloud_cover);
        let lux = sunlight(
            time_s as f64,
            self.params.max_sun_lux,
            cloud,
            self.params.light_pollution_lux,
            self.params.sunset_lux,
        );

        OutdoorConditions {
            time_s,
            fraction,
            cloud_cover: cloud,
            sunlight_lux: lux,
        }
    }
}
