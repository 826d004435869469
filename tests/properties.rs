//! Property tests for the environment, propagation and controller models.

use daylight_controller::controller::{
    BlindController, BlindState, ControllerParameters, MAX_TILT_RAD, MIN_TILT_RAD,
};
use daylight_controller::domain::{
    schedule_value, BrightnessSchedule, LightSource, Point, RoomLayout, Sensor,
};
use daylight_controller::simulation::{
    cloud_cover, sunlight, PropagationModel, SampleAction, SamplingPolicy,
};
use proptest::prelude::*;

const NOON_S: f64 = 43_200.0;

proptest! {
    #[test]
    fn single_cloud_sample_is_constant(c in 0.0f64..=1.0, f in 0.0f64..=1.0) {
        prop_assert_eq!(cloud_cover(f, &[c]), c);
    }

    #[test]
    fn cloud_cover_stays_within_samples(
        clouds in prop::collection::vec(0.0f64..=1.0, 2..8),
        f in 0.0f64..=1.0,
    ) {
        let lo = clouds.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = clouds.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let c = cloud_cover(f, &clouds);
        prop_assert!(c >= lo - 1e-12 && c <= hi + 1e-12);
    }

    #[test]
    fn cloud_cover_starts_and_ends_on_samples(clouds in prop::collection::vec(0.0f64..=1.0, 2..8)) {
        prop_assert_eq!(cloud_cover(0.0, &clouds), clouds[0]);
        let end = cloud_cover(1.0 - 1e-9, &clouds);
        prop_assert!((end - clouds[clouds.len() - 1]).abs() < 1e-6);
    }

    #[test]
    fn sunlight_is_never_negative(
        t in 0u64..200_000,
        max_sun in 0.0f64..100_000.0,
        sunset in 0.0f64..1000.0,
        cloud in 0.0f64..=1.0,
        pollution in 0.0f64..1000.0,
    ) {
        prop_assert!(sunlight(t as f64, max_sun, cloud, pollution, sunset) >= 0.0);
    }

    #[test]
    fn sunlight_peaks_at_solar_noon(
        day in 0u64..5,
        t in 0u64..86_400,
        max_sun in 1000.0f64..100_000.0,
        sunset in 0.0f64..1000.0,
    ) {
        let noon = sunlight(day as f64 * 86_400.0 + NOON_S, max_sun, 0.0, 0.0, sunset);
        let other = sunlight((day * 86_400 + t) as f64, max_sun, 0.0, 0.0, sunset);
        prop_assert!(other <= noon + 1e-6);
    }

    #[test]
    fn controller_is_idle_at_zero_error(
        height in 0.0f64..=1.0,
        tilt in MIN_TILT_RAD..=MAX_TILT_RAD,
        window in 0.0f64..=1.0,
    ) {
        let controller = BlindController::new(ControllerParameters::default());
        let (dh, dtheta) = controller.delta(0.0, window, &BlindState { height, tilt });
        prop_assert_eq!(dh, 0.0);
        prop_assert_eq!(dtheta, 0.0);
    }

    #[test]
    fn room_light_is_finite_and_non_negative(
        positions in prop::collection::vec((-3.0f64..3.0, -1.0f64..3.0), 1..5),
        lights in prop::collection::vec((-3.0f64..3.0, -1.0f64..3.0, 0.0f64..=1.0), 0..4),
        height in 0.0f64..=1.0,
        tilt in MIN_TILT_RAD..=MAX_TILT_RAD,
        f in 0.0f64..=1.0,
    ) {
        let sensors = positions
            .iter()
            .zip(0u32..)
            .map(|(&(x, y), id)| Sensor::new(id, Point::new(x, y), false))
            .collect();
        let lights = lights
            .iter()
            .zip(0u32..)
            .map(|(&(x, y, level), id)| {
                LightSource::new(id, Point::new(x, y), BrightnessSchedule::constant(level))
            })
            .collect();
        let model = PropagationModel::new(RoomLayout::new(sensors, lights), 1600.0, 0.01).unwrap();

        let lux = model.room_light(f, 15_500.0, &BlindState { height, tilt });
        prop_assert!(lux.is_finite());
        prop_assert!(lux >= 0.0);
    }

    #[test]
    fn schedule_lookup_never_out_of_range(
        samples in prop::collection::vec(0.0f64..=1.0, 1..10),
        f in 0.0f64..=1.0,
    ) {
        let value = schedule_value(&samples, f);
        prop_assert!(value.is_some());
        prop_assert!(samples.contains(&value.unwrap()));
    }

    #[test]
    fn scheduled_second_is_always_full(
        period in 1u64..500,
        k in 0u64..100,
        err in -1.0f64..1.0,
        use_battery_response in any::<bool>(),
    ) {
        let policy = SamplingPolicy {
            measure_period_s: period,
            timeout_s: 10,
            error_threshold: 0.1,
            use_battery_response,
        };
        prop_assert_eq!(policy.decide(k * period, err), SampleAction::Full);
    }
}
