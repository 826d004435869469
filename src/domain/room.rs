use serde::{Deserialize, Serialize};
use std::fmt;

use super::schedule::BrightnessSchedule;

// ============================================================================
// Window Geometry
// ============================================================================

/// Window width in meters
pub const WINDOW_WIDTH_M: f64 = 1.143;
/// Window height in meters
pub const WINDOW_HEIGHT_M: f64 = 1.525;
/// Window area in m²
pub const WINDOW_AREA_M2: f64 = WINDOW_HEIGHT_M * WINDOW_WIDTH_M;
/// Height at which the window is mounted, relative to the room origin
pub const ROOM_HEIGHT_M: f64 = 2.5;

/// Smallest squared distance used in inverse-square terms (1 cm).
pub const MIN_DISTANCE_SQ_M2: f64 = 1e-4;

/// Position in the room plane, meters relative to the room origin
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared distance to another point, floored at [`MIN_DISTANCE_SQ_M2`]
    pub fn distance_sq(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).max(MIN_DISTANCE_SQ_M2)
    }
}

/// The window every sensor receives daylight through
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub position: Point,
    pub area_m2: f64,
}

impl Default for Window {
    fn default() -> Self {
        Self {
            position: Point::new(0.0, ROOM_HEIGHT_M),
            area_m2: WINDOW_AREA_M2,
        }
    }
}

// ============================================================================
// Sensors and Light Sources
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SensorId(pub u32);

impl fmt::Display for SensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sensor-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LightSourceId(pub u32);

impl fmt::Display for LightSourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "light-{}", self.0)
    }
}

/// Illuminance sensor placed in the room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    pub id: SensorId,
    pub position: Point,
    /// Battery sensors can only be polled at their scheduled sampling moment
    /// unless call/response is enabled.
    pub battery_powered: bool,
}

impl Sensor {
    pub fn new(id: u32, position: Point, battery_powered: bool) -> Self {
        Self {
            id: SensorId(id),
            position,
            battery_powered,
        }
    }
}

/// Artificial light source with a brightness schedule over the run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightSource {
    pub id: LightSourceId,
    pub position: Point,
    pub schedule: BrightnessSchedule,
}

impl LightSource {
    pub fn new(id: u32, position: Point, schedule: BrightnessSchedule) -> Self {
        Self {
            id: LightSourceId(id),
            position,
            schedule,
        }
    }
}

/// Complete topology of one simulated room
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomLayout {
    pub window: Window,
    pub sensors: Vec<Sensor>,
    pub lights: Vec<LightSource>,
}

impl RoomLayout {
    pub fn new(sensors: Vec<Sensor>, lights: Vec<LightSource>) -> Self {
        Self {
            window: Window::default(),
            sensors,
            lights,
        }
    }

    pub fn sensor_count(&self) -> usize {
        self.sensors.len()
    }

    pub fn battery_sensor_count(&self) -> usize {
        self.sensors.iter().filter(|s| s.battery_powered).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_defaults() {
        let window = Window::default();
        assert_eq!(window.position, Point::new(0.0, 2.5));
        assert!((window.area_m2 - 1.743_075).abs() < 1e-9);
    }

    #[test]
    fn test_distance_sq() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance_sq(&b), 25.0);
        assert_eq!(b.distance_sq(&a), 25.0);
    }

    #[test]
    fn test_coincident_points_are_floored() {
        let p = Point::new(1.0, 1.0);
        assert_eq!(p.distance_sq(&p), MIN_DISTANCE_SQ_M2);
        assert!(p.distance_sq(&p).is_finite());
    }

    #[test]
    fn test_battery_sensor_count() {
        let layout = RoomLayout::new(
            vec![
                Sensor::new(0, Point::new(0.0, 0.0), false),
                Sensor::new(1, Point::new(1.0, 0.0), true),
                Sensor::new(2, Point::new(-1.0, 0.0), true),
            ],
            Vec::new(),
        );
        assert_eq!(layout.sensor_count(), 3);
        assert_eq!(layout.battery_sensor_count(), 2);
        assert_eq!(layout.sensors[1].id.to_string(), "sensor-1");
    }
}
