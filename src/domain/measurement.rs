use serde::{Deserialize, Serialize};

/// Latest illuminance readings in lux.
///
/// Index 0 is the outdoor (window) sensor, followed by one entry per configured
/// room sensor in layout order. Entries keep their value until re-measured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementVector {
    readings: Vec<f64>,
}

impl MeasurementVector {
    /// All-zero readings for `sensor_count` room sensors plus the outdoor sensor
    pub fn new(sensor_count: usize) -> Self {
        Self {
            readings: vec![0.0; sensor_count + 1],
        }
    }

    pub fn outdoor(&self) -> f64 {
        self.readings[0]
    }

    pub fn set_outdoor(&mut self, lux: f64) {
        self.readings[0] = lux;
    }

    /// Readings of the room sensors only
    pub fn sensors(&self) -> &[f64] {
        &self.readings[1..]
    }

    pub fn sensor(&self, index: usize) -> Option<f64> {
        self.sensors().get(index).copied()
    }

    pub fn set_sensor(&mut self, index: usize, lux: f64) {
        self.readings[index + 1] = lux;
    }

    pub fn sensor_count(&self) -> usize {
        self.readings.len() - 1
    }

    /// Mean room-sensor reading, 0 when no room sensors exist
    pub fn sensor_mean(&self) -> f64 {
        let sensors = self.sensors();
        if sensors.is_empty() {
            return 0.0;
        }
        sensors.iter().sum::<f64>() / sensors.len() as f64
    }
}
