//! # Daylight Simulation Module
//!
//! Simulates a room lit through a window with an adjustable blind and by
//! artificial light sources, under closed-loop blind control.
//!
//! ## Components
//!
//! - **Environment**: Outdoor sunlight from a diurnal curve, eased cloud cover and light pollution
//! - **Propagation**: Inverse-square illuminance at each sensor, ground truth and noisy measurements
//! - **Sampling**: Periodic sampling with threshold/timeout-triggered re-sampling of wired sensors
//! - **Runner**: Second-by-second loop that drives the blind controller and records results
//! - **Sink**: Destinations for the recorded result series
//!
//! ## Usage
//!
//! ```rust
//! use daylight_controller::domain::{Point, RoomLayout, Sensor};
//! use daylight_controller::simulation::{MemorySink, Simulation, SimulationParameters};
//!
//! let mut params = SimulationParameters::default();
//! params.environment.duration_s = 600;
//! params.random_seed = Some(42);
//!
//! let layout = RoomLayout::new(vec![Sensor::new(0, Point::new(0.5, 0.0), false)], vec![]);
//! let mut sink = MemorySink::new();
//! let report = Simulation::new(params, layout)?.run(&mut sink)?;
//!
//! assert_eq!(report.series.len(), 600);
//! # Ok::<(), daylight_controller::error::SimulationError>(())
//! ```

pub mod environment;
pub mod propagation;
pub mod runner;
pub mod sampling;
pub mod series;
pub mod sink;

pub use environment::{
    cloud_cover, cos_curve, sunlight, EnvironmentModel, EnvironmentParameters, OutdoorConditions,
};
pub use propagation::{PropagationModel, DEFAULT_NOISE_STD_DEV};
pub use runner::{duration_seconds, RunStats, Simulation, SimulationParameters, SimulationReport};
pub use sampling::{ReferenceSchedule, SampleAction, SamplingPolicy};
pub use series::{ResultRow, ResultSeries};
pub use sink::{CsvSink, JsonSink, MemorySink, ResultSink};
