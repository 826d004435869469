//! Daylight harvesting simulator: blind height/tilt feedback control of room
//! illuminance with adaptive, battery-aware sensor sampling.

pub mod config;
pub mod controller;
pub mod domain;
pub mod error;
pub mod simulation;
pub mod telemetry;
