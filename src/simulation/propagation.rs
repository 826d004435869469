//! # Illuminance Propagation
//!
//! Inverse-square point-source model from the window and each light source to
//! every sensor. The ground-truth variant is deterministic; the measured
//! variants add Gaussian noise to every additive term.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::controller::BlindState;
use crate::domain::{MeasurementVector, RoomLayout, Sensor};
use crate::error::SimulationError;

/// Default standard deviation of sensor noise (lux)
pub const DEFAULT_NOISE_STD_DEV: f64 = 0.01;

/// Illuminance model for one room layout
#[derive(Debug, Clone)]
pub struct PropagationModel {
    layout: RoomLayout,
    /// Luminous output of a light source at full brightness (lm)
    max_brightness_lm: f64,
    noise: Normal<f64>,
}

impl PropagationModel {
    pub fn new(
        layout: RoomLayout,
        max_brightness_lm: f64,
        noise_std_dev: f64,
    ) -> Result<Self, SimulationError> {
        if !noise_std_dev.is_finite() || noise_std_dev < 0.0 {
            return Err(SimulationError::InvalidNoise(noise_std_dev));
        }
        Ok(Self {
            layout,
            max_brightness_lm,
            noise: Normal::new(0.0, noise_std_dev)?,
        })
    }

    pub fn layout(&self) -> &RoomLayout {
        &self.layout
    }

    /// Daylight passing the window and blind
    pub fn window_light(&self, sunlight: f64, blind: &BlindState) -> f64 {
        self.layout.window.area_m2 * blind.transmission() * sunlight
    }

    /// Luminous output of every light source at an elapsed-time fraction
    fn light_outputs(&self, fraction: f64) -> Vec<f64> {
        self.layout
            .lights
            .iter()
            .map(|light| light.schedule.level_at(fraction) * self.max_brightness_lm)
            .collect()
    }

    /// Deterministic illuminance at one sensor
    fn sensor_lux(&self, sensor: &Sensor, window_light: f64, outputs: &[f64]) -> f64 {
        let window_d2 = sensor.position.distance_sq(&self.layout.window.position);
        let from_lights: f64 = self
            .layout
            .lights
            .iter()
            .zip(outputs)
            .map(|(light, &lum)| lum / sensor.position.distance_sq(&light.position))
            .sum();
        window_light / window_d2 + from_lights
    }

    /// Illuminance at one sensor with every term perturbed by sensor noise
    fn noisy_sensor_lux<R: Rng + ?Sized>(
        &self,
        sensor: &Sensor,
        window_light: f64,
        outputs: &[f64],
        rng: &mut R,
    ) -> f64 {
        let window_d2 = sensor.position.distance_sq(&self.layout.window.position);
        let mut lux = (window_light + self.noise.sample(rng)) / window_d2;
        for (light, &lum) in self.layout.lights.iter().zip(outputs) {
            lux += (lum + self.noise.sample(rng)) / sensor.position.distance_sq(&light.position);
        }
        lux
    }

    /// Ground-truth mean room illuminance, 0 when the room has no sensors
    pub fn room_light(&self, fraction: f64, sunlight: f64, blind: &BlindState) -> f64 {
        if self.layout.sensors.is_empty() {
            return 0.0;
        }
        let window_light = self.window_light(sunlight, blind);
        let outputs = self.light_outputs(fraction);
        let total: f64 = self
            .layout
            .sensors
            .iter()
            .map(|sensor| self.sensor_lux(sensor, window_light, &outputs))
            .sum();
        total / self.layout.sensors.len() as f64
    }

    /// Poll every sensor, including the outdoor one
    pub fn measure<R: Rng + ?Sized>(
        &self,
        fraction: f64,
        sunlight: f64,
        blind: &BlindState,
        measurements: &mut MeasurementVector,
        rng: &mut R,
    ) {
        measurements.set_outdoor(sunlight + self.noise.sample(rng));
        self.poll(fraction, sunlight, blind, measurements, rng, true);
    }

    /// Poll wired room sensors only.
    ///
    /// Battery-powered sensors and the outdoor sensor keep their last reading.
    pub fn partial_measure<R: Rng + ?Sized>(
        &self,
        fraction: f64,
        sunlight: f64,
        blind: &BlindState,
        measurements: &mut MeasurementVector,
        rng: &mut R,
    ) {
        self.poll(fraction, sunlight, blind, measurements, rng, false);
    }

    fn poll<R: Rng + ?Sized>(
        &self,
        fraction: f64,
        sunlight: f64,
        blind: &BlindState,
        measurements: &mut MeasurementVector,
        rng: &mut R,
        include_battery: bool,
    ) {
        let window_light = self.window_light(sunlight, blind);
        let outputs = self.light_outputs(fraction);
        for (i, sensor) in self.layout.sensors.iter().enumerate() {
            if sensor.battery_powered && !include_battery {
                continue;
            }
            let lux = self.noisy_sensor_lux(sensor, window_light, &outputs, rng);
            measurements.set_sensor(i, lux);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BrightnessSchedule, LightSource, Point, WINDOW_AREA_M2};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn layout() -> RoomLayout {
        RoomLayout::new(
            vec![
                Sensor::new(0, Point::new(0.0, 0.0), false),
                Sensor::new(1, Point::new(1.5, 2.5), true),
            ],
            vec![LightSource::new(
                0,
                Point::new(0.0, 1.0),
                BrightnessSchedule::new(vec![0.5, 1.0]),
            )],
        )
    }

    #[test]
    fn test_window_light_open_blind() {
        let model = PropagationModel::new(layout(), 1600.0, DEFAULT_NOISE_STD_DEV).unwrap();
        let open = BlindState {
            height: 0.0,
            tilt: 0.3,
        };
        assert!((model.window_light(1000.0, &open) - WINDOW_AREA_M2 * 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_closed_blind_blocks_window() {
        let model = PropagationModel::new(RoomLayout::default(), 1600.0, 0.01).unwrap();
        let closed = BlindState {
            height: 1.0,
            tilt: 0.0,
        };
        assert!(model.window_light(10_000.0, &closed).abs() < 1e-9);
    }

    #[test]
    fn test_room_light_inverse_square() {
        let model = PropagationModel::new(layout(), 1600.0, 0.01).unwrap();
        let blind = BlindState::default();
        let window_light = model.window_light(2000.0, &blind);

        // Sensor 0: window 2.5 m away, light 1 m away at 50% of 1600 lm.
        let s0 = window_light / 6.25 + 800.0 / 1.0;
        // Sensor 1: window 1.5 m away, light sqrt(1.5² + 1.5²) away.
        let s1 = window_light / 2.25 + 800.0 / 4.5;

        let room = model.room_light(0.2, 2000.0, &blind);
        assert!((room - (s0 + s1) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_room_light_without_sensors() {
        let model = PropagationModel::new(RoomLayout::default(), 1600.0, 0.01).unwrap();
        assert_eq!(model.room_light(0.5, 10_000.0, &BlindState::default()), 0.0);
    }

    #[test]
    fn test_measure_is_close_to_ground_truth() {
        let model = PropagationModel::new(layout(), 1600.0, 0.01).unwrap();
        let blind = BlindState::default();
        let mut rng = StdRng::seed_from_u64(7);
        let mut m = MeasurementVector::new(2);

        model.measure(0.7, 5000.0, &blind, &mut m, &mut rng);

        assert!((m.outdoor() - 5000.0).abs() < 0.1);
        let truth = model.room_light(0.7, 5000.0, &blind);
        assert!((m.sensor_mean() - truth).abs() < 0.5);
    }

    #[test]
    fn test_partial_measure_skips_battery_and_outdoor() {
        let model = PropagationModel::new(layout(), 1600.0, 0.01).unwrap();
        let blind = BlindState::default();
        let mut rng = StdRng::seed_from_u64(11);
        let mut m = MeasurementVector::new(2);

        model.measure(0.1, 5000.0, &blind, &mut m, &mut rng);
        let outdoor = m.outdoor();
        let battery = m.sensor(1);
        let wired = m.sensor(0);

        model.partial_measure(0.9, 8000.0, &blind, &mut m, &mut rng);

        assert_eq!(m.outdoor(), outdoor);
        assert_eq!(m.sensor(1), battery);
        assert_ne!(m.sensor(0), wired);
    }

    #[test]
    fn test_invalid_noise_rejected() {
        for sigma in [-1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                PropagationModel::new(RoomLayout::default(), 1600.0, sigma),
                Err(SimulationError::InvalidNoise(_))
            ));
        }
        assert!(PropagationModel::new(RoomLayout::default(), 1600.0, 0.0).is_ok());
    }
}
