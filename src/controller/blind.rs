//! Proportional blind controller
//!
//! Drives blind height `h` and tilt `θ` so that the mean measured room
//! illuminance follows a reference fraction of `max_lux`.
//!
//! # Update law
//! - `window = clip(outdoor / max_lux, 0, 1)`
//! - `room   = clip(mean(sensors) / max_lux, 0, 1)`
//! - `err    = ref - room`
//! - `Δh = -αh · err · window · cos θ`
//! - `Δθ =  αθ · err · window · h · sin θ`
//!
//! Scaling by `window` makes the controller inert at night. The trigonometric
//! factors shrink the steps as height and tilt approach their limits.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::domain::MeasurementVector;

/// Lower tilt bound (1°)
pub const MIN_TILT_RAD: f64 = PI / 180.0;
/// Upper tilt bound (90°)
pub const MAX_TILT_RAD: f64 = PI / 2.0;
/// Tilt at the start of every run (45°)
pub const INITIAL_TILT_RAD: f64 = PI / 4.0;

/// Physical blind position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlindState {
    /// Fractional coverage, 0 = fully open
    pub height: f64,
    /// Slat angle in radians
    pub tilt: f64,
}

impl Default for BlindState {
    fn default() -> Self {
        Self {
            height: 0.0,
            tilt: INITIAL_TILT_RAD,
        }
    }
}

impl BlindState {
    /// Fraction of window light that passes the blind
    pub fn transmission(&self) -> f64 {
        1.0 - self.height * self.tilt.cos()
    }
}

/// Mutable controller state for one run
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControllerState {
    pub blind: BlindState,
    /// Last computed tracking error (fraction of `max_lux`)
    pub error: f64,
    /// Current reference fraction
    pub reference: f64,
}

/// Step sizes and scaling for the blind update
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControllerParameters {
    /// Illuminance corresponding to a 100% reference (lux)
    pub max_lux: f64,
    /// Height step size αh
    pub height_step: f64,
    /// Tilt step size αθ
    pub tilt_step: f64,
}

impl Default for ControllerParameters {
    fn default() -> Self {
        Self {
            max_lux: 2000.0,
            height_step: 0.05,
            tilt_step: 0.05,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BlindController {
    params: ControllerParameters,
}

impl BlindController {
    pub fn new(params: ControllerParameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ControllerParameters {
        &self.params
    }

    /// Height and tilt increments for a given error, outdoor factor and blind.
    ///
    /// Both are exactly zero when `error == 0`.
    pub fn delta(&self, error: f64, window: f64, blind: &BlindState) -> (f64, f64) {
        let dh = -self.params.height_step * error * window * blind.tilt.cos();
        let dtheta = self.params.tilt_step * error * window * blind.height * blind.tilt.sin();
        (dh, dtheta)
    }

    /// Apply one control update from the latest measurements.
    ///
    /// Without room sensors there is nothing to track and the state is left
    /// untouched.
    pub fn update(&self, state: &mut ControllerState, measurements: &MeasurementVector) {
        if measurements.sensor_count() == 0 {
            return;
        }

        let window = (measurements.outdoor() / self.params.max_lux).clamp(0.0, 1.0);
        let room = (measurements.sensor_mean() / self.params.max_lux).clamp(0.0, 1.0);
        state.error = state.reference - room;

        let (dh, dtheta) = self.delta(state.error, window, &state.blind);
        state.blind.height = (state.blind.height + dh).clamp(0.0, 1.0);
        state.blind.tilt = (state.blind.tilt + dtheta).clamp(MIN_TILT_RAD, MAX_TILT_RAD);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measurements(outdoor: f64, sensors: &[f64]) -> MeasurementVector {
        let mut m = MeasurementVector::new(sensors.len());
        m.set_outdoor(outdoor);
        for (i, &lux) in sensors.iter().enumerate() {
            m.set_sensor(i, lux);
        }
        m
    }

    #[test]
    fn test_zero_error_is_idempotent() {
        let controller = BlindController::new(ControllerParameters::default());
        let blind = BlindState {
            height: 0.4,
            tilt: 0.7,
        };
        assert_eq!(controller.delta(0.0, 1.0, &blind), (0.0, 0.0));

        // Room reading of 1000 lux against a 50% reference of 2000 lux.
        let mut state = ControllerState {
            blind,
            error: 0.3,
            reference: 0.5,
        };
        controller.update(&mut state, &measurements(15_000.0, &[1000.0]));
        assert_eq!(state.error, 0.0);
        assert_eq!(state.blind, blind);
    }

    #[test]
    fn test_too_bright_lowers_blind() {
        let controller = BlindController::new(ControllerParameters::default());
        let mut state = ControllerState {
            reference: 0.25,
            ..Default::default()
        };

        controller.update(&mut state, &measurements(15_000.0, &[4000.0]));

        assert!((state.error - (-0.75)).abs() < 1e-12);
        assert!(state.blind.height > 0.0);
        // Tilt delta scales with the previous height, which was zero.
        assert_eq!(state.blind.tilt, INITIAL_TILT_RAD);
    }

    #[test]
    fn test_inert_at_night() {
        let controller = BlindController::new(ControllerParameters::default());
        let mut state = ControllerState {
            blind: BlindState {
                height: 0.5,
                tilt: 0.5,
            },
            reference: 1.0,
            ..Default::default()
        };
        let before = state.blind;

        controller.update(&mut state, &measurements(0.0, &[10.0]));

        assert!(state.error > 0.0);
        assert_eq!(state.blind, before);
    }

    #[test]
    fn test_state_respects_limits() {
        let controller = BlindController::new(ControllerParameters {
            max_lux: 2000.0,
            height_step: 10.0,
            tilt_step: 10.0,
        });
        let mut state = ControllerState {
            blind: BlindState {
                height: 0.9,
                tilt: 0.1,
            },
            reference: 0.0,
            ..Default::default()
        };

        for _ in 0..20 {
            controller.update(&mut state, &measurements(20_000.0, &[5000.0, 5000.0]));
            assert!((0.0..=1.0).contains(&state.blind.height));
            assert!((MIN_TILT_RAD..=MAX_TILT_RAD).contains(&state.blind.tilt));
        }
        assert_eq!(state.blind.height, 1.0);
        assert_eq!(state.blind.tilt, MIN_TILT_RAD);
    }

    #[test]
    fn test_no_sensors_is_noop() {
        let controller = BlindController::new(ControllerParameters::default());
        let mut state = ControllerState {
            reference: 0.5,
            ..Default::default()
        };
        controller.update(&mut state, &measurements(15_000.0, &[]));
        assert_eq!(state, ControllerState {
            reference: 0.5,
            ..Default::default()
        });
    }
}
