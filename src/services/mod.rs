// Business logic services

pub mod exercise_service;
pub mod progress_service;
pub mod schedule_service;
pub mod workout_plan_service;

pub use exercise_service::ExerciseService;
pub use progress_service::ProgressService;
pub use schedule_service::ScheduleService;
pub use workout_plan_service::WorkoutPlanService;
