//! # Simulation Loop
//!
//! Advances one run second by second: outdoor conditions, reference stepping,
//! sampling decision, controller update and recording. The run is sequential
//! because every second depends on the controller state of the previous one.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::environment::{EnvironmentModel, EnvironmentParameters};
use super::propagation::{PropagationModel, DEFAULT_NOISE_STD_DEV};
use super::sampling::{ReferenceSchedule, SampleAction, SamplingPolicy};
use super::series::{ResultRow, ResultSeries};
use super::sink::ResultSink;
use crate::controller::{BlindController, ControllerParameters, ControllerState};
use crate::domain::{MeasurementVector, RoomLayout};
use crate::error::SimulationError;

/// Number of simulated seconds for a run of `hours`, endpoints inclusive
pub fn duration_seconds(hours: f64) -> u64 {
    ((3600.0 * hours).round().max(0.0) as u64).saturating_add(1)
}

/// Every scalar and sequence a run needs besides the room layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationParameters {
    pub environment: EnvironmentParameters,
    pub controller: ControllerParameters,
    pub sampling: SamplingPolicy,
    /// Reference fractions (0..1), each held for an equal share of the run
    pub references: Vec<f64>,
    /// Luminous output of a light source at 100% brightness (lm)
    pub max_brightness_lm: f64,
    /// Standard deviation of sensor noise (lux)
    pub noise_std_dev: f64,
    /// Seed for sensor noise (None = random)
    pub random_seed: Option<u64>,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            environment: EnvironmentParameters::default(),
            controller: ControllerParameters::default(),
            sampling: SamplingPolicy::default(),
            references: vec![0.25, 0.5, 0.25],
            max_brightness_lm: 1600.0,
            noise_std_dev: DEFAULT_NOISE_STD_DEV,
            random_seed: None,
        }
    }
}

/// Sampling counters of one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub steps: u64,
    pub full_samples: u64,
    pub partial_samples: u64,
    pub skipped: u64,
}

impl RunStats {
    fn record(&mut self, action: SampleAction) {
        self.steps += 1;
        match action {
            SampleAction::Full => self.full_samples += 1,
            SampleAction::Partial => self.partial_samples += 1,
            SampleAction::Skip => self.skipped += 1,
        }
    }
}

/// Outcome of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub series: ResultSeries,
    pub stats: RunStats,
    pub final_state: ControllerState,
    /// The run was stopped before its last second
    pub cancelled: bool,
}

/// State and collaborators of a single run
pub struct Simulation {
    environment: EnvironmentModel,
    propagation: PropagationModel,
    policy: SamplingPolicy,
    controller: BlindController,
    references: ReferenceSchedule,
    state: ControllerState,
    measurements: MeasurementVector,
    rng: StdRng,
}

impl Simulation {
    pub fn new(params: SimulationParameters, layout: RoomLayout) -> Result<Self, SimulationError> {
        let rng = match params.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let measurements = MeasurementVector::new(layout.sensor_count());
        let references = ReferenceSchedule::new(params.references, params.environment.duration_s);
        let propagation =
            PropagationModel::new(layout, params.max_brightness_lm, params.noise_std_dev)?;

        Ok(Self {
            environment: EnvironmentModel::new(params.environment),
            propagation,
            policy: params.sampling,
            controller: BlindController::new(params.controller),
            references,
            state: ControllerState::default(),
            measurements,
            rng,
        })
    }

    pub fn duration_s(&self) -> u64 {
        self.environment.duration_s()
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn measurements(&self) -> &MeasurementVector {
        &self.measurements
    }

    /// Simulate second `s` and return its recorded row with the action taken.
    ///
    /// Steps must be called in order starting at 0.
    pub fn step(&mut self, s: u64) -> (ResultRow, SampleAction) {
        let outdoor = self.environment.at(s);

        if let Some(reference) = self.references.advance(s) {
            self.state.reference = reference;
        }

        let action = self.policy.decide(s, self.state.error);
        match action {
            SampleAction::Full => self.propagation.measure(
                outdoor.fraction,
                outdoor.sunlight_lux,
                &self.state.blind,
                &mut self.measurements,
                &mut self.rng,
            ),
            SampleAction::Partial => self.propagation.partial_measure(
                outdoor.fraction,
                outdoor.sunlight_lux,
                &self.state.blind,
                &mut self.measurements,
                &mut self.rng,
            ),
            SampleAction::Skip => {}
        }

        if action != SampleAction::Skip {
            self.controller.update(&mut self.state, &self.measurements);
            debug!(
                second = s,
                action = action.as_ref(),
                error = self.state.error,
                height = self.state.blind.height,
                tilt = self.state.blind.tilt,
                "controller update"
            );
        }

        let room = self
            .propagation
            .room_light(outdoor.fraction, outdoor.sunlight_lux, &self.state.blind);

        let row = ResultRow {
            time_h: s as f64 / 3600.0,
            outside_lux: outdoor.sunlight_lux,
            reference_lux: self.state.reference * self.controller.params().max_lux,
            room_lux: room,
            measured_lux: self.measurements.sensor_mean(),
        };
        (row, action)
    }

    /// Run to completion and hand the series to `sink`
    pub fn run(self, sink: &mut dyn ResultSink) -> Result<SimulationReport, SimulationError> {
        self.run_until_cancelled(sink, &CancellationToken::new())
    }

    /// Run until completion or cancellation; checked once per simulated second.
    ///
    /// A cancelled run still hands its partial series to `sink`.
    pub fn run_until_cancelled(
        self,
        sink: &mut dyn ResultSink,
        cancel: &CancellationToken,
    ) -> Result<SimulationReport, SimulationError> {
        self.run_with(sink, |_| cancel.is_cancelled())
    }

    /// Main loop; `stop` is polled with the upcoming second before each step
    fn run_with<F>(
        mut self,
        sink: &mut dyn ResultSink,
        mut stop: F,
    ) -> Result<SimulationReport, SimulationError>
    where
        F: FnMut(u64) -> bool,
    {
        let duration = self.duration_s();
        let layout = self.propagation.layout();
        info!(
            duration_s = duration,
            sensors = layout.sensor_count(),
            battery_sensors = layout.battery_sensor_count(),
            lights = layout.lights.len(),
            "starting simulation"
        );

        let mut series = ResultSeries::with_capacity(
            self.environment.params().start_time_s,
            duration as usize,
        );
        let mut stats = RunStats::default();
        let mut cancelled = false;

        for s in 0..duration {
            if stop(s) {
                warn!(second = s, "simulation cancelled");
                cancelled = true;
                break;
            }
            let (row, action) = self.step(s);
            stats.record(action);
            series.push(row);
        }

        sink.accept(&series)?;

        info!(
            steps = stats.steps,
            full_samples = stats.full_samples,
            partial_samples = stats.partial_samples,
            cancelled,
            height = self.state.blind.height,
            tilt = self.state.blind.tilt,
            "simulation finished"
        );

        Ok(SimulationReport {
            series,
            stats,
            final_state: self.state,
            cancelled,
        })
    }
}
