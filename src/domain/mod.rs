pub mod measurement;
pub mod room;
pub mod schedule;

pub use measurement::*;
pub use room::*;
pub use schedule::*;
