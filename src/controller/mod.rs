pub mod blind;

pub use blind::{
    BlindController, BlindState, ControllerParameters, ControllerState, INITIAL_TILT_RAD,
    MAX_TILT_RAD, MIN_TILT_RAD,
};
