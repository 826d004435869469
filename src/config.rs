use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use strum::{Display, EnumString};
use tracing::warn;
use validator::Validate;

use crate::controller::ControllerParameters;
use crate::domain::{BrightnessSchedule, LightSource, Point, RoomLayout, Sensor};
use crate::error::ConfigError;
use crate::simulation::{
    duration_seconds, EnvironmentParameters, SamplingPolicy, SimulationParameters,
    DEFAULT_NOISE_STD_DEV,
};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const ENV_PREFIX: &str = "DAYLIGHT__";

pub const MAX_SENSORS: usize = 10;
pub const MAX_LIGHT_SOURCES: usize = 10;
/// Longest accepted run (31 days)
pub const MAX_DURATION_HOURS: f64 = 744.0;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub environment: EnvironmentConfig,
    #[serde(default)]
    pub controller: ControllerConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub sensors: Vec<SensorConfig>,
    #[serde(default)]
    pub lights: Vec<LightConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct EnvironmentConfig {
    #[validate(range(min = 0.0))]
    pub max_sun_lux: f64,
    #[validate(range(min = 0.0))]
    pub max_brightness_lm: f64,
    #[validate(range(min = 0.0))]
    pub light_pollution_lux: f64,
    #[validate(range(min = 0.0))]
    pub sunset_lux: f64,
    /// Comma-separated percentages, e.g. "0,30,15"
    pub cloud_cover_percent: String,
    #[validate(range(min = 0.0, max = 24.0))]
    pub start_time_hours: f64,
    #[validate(range(min = 0.0))]
    pub duration_hours: f64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            max_sun_lux: 15_000.0,
            max_brightness_lm: 1600.0,
            light_pollution_lux: 500.0,
            sunset_lux: 400.0,
            cloud_cover_percent: "0,30,15".into(),
            start_time_hours: 6.0,
            duration_hours: 12.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct ControllerConfig {
    /// Illuminance at a 100% reference
    #[validate(range(min = 1.0))]
    pub max_lux: f64,
    #[validate(range(min = 0.0))]
    pub height_step: f64,
    #[validate(range(min = 0.0))]
    pub tilt_step: f64,
    #[validate(range(min = 1))]
    pub sample_period_s: u64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub error_threshold_percent: f64,
    pub timeout_s: u64,
    pub use_battery_response: bool,
    /// Comma-separated percentages, e.g. "25,50,25"
    pub reference_percent: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            max_lux: 2000.0,
            height_step: 0.05,
            tilt_step: 0.05,
            sample_period_s: 60,
            error_threshold_percent: 0.1,
            timeout_s: 10,
            use_battery_response: false,
            reference_percent: "25,50,25".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct RunConfig {
    pub random_seed: Option<u64>,
    #[validate(range(min = 0.0))]
    pub noise_std_dev: f64,
    pub output_format: OutputFormat,
    /// Write results here instead of stdout
    pub output_path: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            random_seed: None,
            noise_std_dev: DEFAULT_NOISE_STD_DEV,
            output_format: OutputFormat::Csv,
            output_path: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SensorConfig {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub battery_powered: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LightConfig {
    pub x: f64,
    pub y: f64,
    /// Comma-separated percentages, e.g. "50,100"
    pub brightness_percent: String,
}

/// Validated inputs for one run
#[derive(Debug, Clone)]
pub struct SimulationSetup {
    pub params: SimulationParameters,
    pub layout: RoomLayout,
}

/// Parse a comma-separated list of percentages into fractions.
///
/// Values outside 0..100 are clamped.
pub fn parse_percent_list(field: &'static str, raw: &str) -> Result<Vec<f64>, ConfigError> {
    if raw.trim().is_empty() {
        return Err(ConfigError::EmptyList { field });
    }

    raw.split(',')
        .map(|token| {
            let token = token.trim();
            let percent: f64 = token.parse().map_err(|_| ConfigError::InvalidNumber {
                field,
                value: token.to_string(),
            })?;
            if !percent.is_finite() {
                return Err(ConfigError::InvalidNumber {
                    field,
                    value: token.to_string(),
                });
            }
            let fraction = percent / 100.0;
            if !(0.0..=1.0).contains(&fraction) {
                warn!(field, percent, "percentage outside 0..100, clamping");
            }
            Ok(fraction.clamp(0.0, 1.0))
        })
        .collect()
}

fn ensure_finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}

impl Config {
    /// Load from `path` (or the default file) with `DAYLIGHT__` env overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
        let figment = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));
        Ok(figment.extract()?)
    }

    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Ok(Figment::from(Toml::string(toml)).extract()?)
    }

    /// Validate and convert into simulation inputs; fails before any run starts
    pub fn build(&self) -> Result<SimulationSetup, ConfigError> {
        self.check_finite()?;
        self.environment.validate()?;
        self.controller.validate()?;
        self.run.validate()?;

        if self.environment.duration_hours > MAX_DURATION_HOURS {
            return Err(ConfigError::Validation(format!(
                "environment.duration_hours {} exceeds {MAX_DURATION_HOURS}",
                self.environment.duration_hours
            )));
        }

        if self.sensors.len() > MAX_SENSORS {
            return Err(ConfigError::TooMany {
                kind: "sensors",
                count: self.sensors.len(),
                max: MAX_SENSORS,
            });
        }
        if self.lights.len() > MAX_LIGHT_SOURCES {
            return Err(ConfigError::TooMany {
                kind: "light sources",
                count: self.lights.len(),
                max: MAX_LIGHT_SOURCES,
            });
        }

        let cloud_cover = parse_percent_list(
            "environment.cloud_cover_percent",
            &self.environment.cloud_cover_percent,
        )?;
        let references = parse_percent_list(
            "controller.reference_percent",
            &self.controller.reference_percent,
        )?;

        let sensors = self
            .sensors
            .iter()
            .zip(0u32..)
            .map(|(s, id)| Sensor::new(id, Point::new(s.x, s.y), s.battery_powered))
            .collect();

        let lights = self
            .lights
            .iter()
            .zip(0u32..)
            .map(|(l, id)| {
                let levels = parse_percent_list("lights.brightness_percent", &l.brightness_percent)?;
                Ok(LightSource::new(
                    id,
                    Point::new(l.x, l.y),
                    BrightnessSchedule::new(levels),
                ))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let params = SimulationParameters {
            environment: EnvironmentParameters {
                max_sun_lux: self.environment.max_sun_lux,
                light_pollution_lux: self.environment.light_pollution_lux,
                sunset_lux: self.environment.sunset_lux,
                cloud_cover,
                start_time_s: (3600.0 * self.environment.start_time_hours).round() as u64,
                duration_s: duration_seconds(self.environment.duration_hours),
            },
            controller: ControllerParameters {
                max_lux: self.controller.max_lux,
                height_step: self.controller.height_step,
                tilt_step: self.controller.tilt_step,
            },
            sampling: SamplingPolicy {
                measure_period_s: self.controller.sample_period_s,
                timeout_s: self.controller.timeout_s,
                error_threshold: self.controller.error_threshold_percent / 100.0,
                use_battery_response: self.controller.use_battery_response,
            },
            references,
            max_brightness_lm: self.environment.max_brightness_lm,
            noise_std_dev: self.run.noise_std_dev,
            random_seed: self.run.random_seed,
        };

        Ok(SimulationSetup {
            params,
            layout: RoomLayout::new(sensors, lights),
        })
    }

    /// TOML accepts `inf` and `nan`, which range checks let through
    fn check_finite(&self) -> Result<(), ConfigError> {
        let env = &self.environment;
        let ctl = &self.controller;
        for (field, value) in [
            ("environment.max_sun_lux", env.max_sun_lux),
            ("environment.max_brightness_lm", env.max_brightness_lm),
            ("environment.light_pollution_lux", env.light_pollution_lux),
            ("environment.sunset_lux", env.sunset_lux),
            ("environment.start_time_hours", env.start_time_hours),
            ("environment.duration_hours", env.duration_hours),
            ("controller.max_lux", ctl.max_lux),
            ("controller.height_step", ctl.height_step),
            ("controller.tilt_step", ctl.tilt_step),
            ("controller.error_threshold_percent", ctl.error_threshold_percent),
            ("run.noise_std_dev", self.run.noise_std_dev),
        ] {
            ensure_finite(field, value)?;
        }

        for sensor in &self.sensors {
            ensure_finite("sensors.x", sensor.x)?;
            ensure_finite("sensors.y", sensor.y)?;
        }
        for light in &self.lights {
            ensure_finite("lights.x", light.x)?;
            ensure_finite("lights.y", light.y)?;
        }
        Ok(())
    }
}
