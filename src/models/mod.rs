// Domain records and request bodies

pub mod exercise;
pub mod progress;
pub mod scheduled_workout;
pub mod user;
pub mod workout_plan;

pub use exercise::*;
pub use progress::*;
pub use scheduled_workout::*;
pub use user::*;
pub use workout_plan::*;
