use serde::{Deserialize, Serialize};

/// One recorded simulated second
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub time_h: f64,
    pub outside_lux: f64,
    pub reference_lux: f64,
    pub room_lux: f64,
    pub measured_lux: f64,
}

/// Five parallel time series, one entry per simulated second.
///
/// Columns only grow together through [`ResultSeries::push`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSeries {
    /// Simulated start time of day (seconds)
    start_time_s: u64,
    /// Elapsed time since run start (hours)
    time_h: Vec<f64>,
    /// Outdoor illuminance (lux)
    outside_lux: Vec<f64>,
    /// Reference illuminance, `ref · max_lux` (lux)
    reference_lux: Vec<f64>,
    /// Ground-truth mean room illuminance (lux)
    room_lux: Vec<f64>,
    /// Mean measured room illuminance, outdoor sensor excluded (lux)
    measured_lux: Vec<f64>,
}

impl ResultSeries {
    pub fn new(start_time_s: u64) -> Self {
        Self {
            start_time_s,
            ..Default::default()
        }
    }

    pub fn with_capacity(start_time_s: u64, capacity: usize) -> Self {
        Self {
            start_time_s,
            time_h: Vec::with_capacity(capacity),
            outside_lux: Vec::with_capacity(capacity),
            reference_lux: Vec::with_capacity(capacity),
            room_lux: Vec::with_capacity(capacity),
            measured_lux: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, row: ResultRow) {
        self.time_h.push(row.time_h);
        self.outside_lux.push(row.outside_lux);
        self.reference_lux.push(row.reference_lux);
        self.room_lux.push(row.room_lux);
        self.measured_lux.push(row.measured_lux);
    }

    pub fn len(&self) -> usize {
        self.time_h.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_h.is_empty()
    }

    pub fn start_time_s(&self) -> u64 {
        self.start_time_s
    }

    pub fn time_h(&self) -> &[f64] {
        &self.time_h
    }

    pub fn outside_lux(&self) -> &[f64] {
        &self.outside_lux
    }

    pub fn reference_lux(&self) -> &[f64] {
        &self.reference_lux
    }

    pub fn room_lux(&self) -> &[f64] {
        &self.room_lux
    }

    pub fn measured_lux(&self) -> &[f64] {
        &self.measured_lux
    }

    pub fn row(&self, i: usize) -> Option<ResultRow> {
        Some(ResultRow {
            time_h: *self.time_h.get(i)?,
            outside_lux: *self.outside_lux.get(i)?,
            reference_lux: *self.reference_lux.get(i)?,
            room_lux: *self.room_lux.get(i)?,
            measured_lux: *self.measured_lux.get(i)?,
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = ResultRow> + '_ {
        (0..self.len()).filter_map(move |i| self.row(i))
    }

    /// Time axis as hours of the simulated day
    pub fn time_of_day_hours(&self) -> impl Iterator<Item = f64> + '_ {
        let offset = self.start_time_s as f64 / 3600.0;
        self.time_h.iter().map(move |t| t + offset)
    }

    /// Mean absolute difference between room and reference illuminance
    pub fn mean_tracking_error_lux(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        let total: f64 = self
            .room_lux
            .iter()
            .zip(&self.reference_lux)
            .map(|(room, reference)| (room - reference).abs())
            .sum();
        Some(total / self.len() as f64)
    }
}
