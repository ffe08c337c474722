//! Persistence boundary.
//!
//! Every component receives an explicitly constructed `Arc<dyn Store>` instead
//! of reaching for a process-wide pool. [`PgStore`] backs the running service;
//! [`MemoryStore`] gives each test its own isolated instance with the same
//! contracts.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    Exercise, ExerciseCategory, NewScheduledWorkout, NewUser, NewWorkoutLog, PlanDraft,
    PlanReplacement, ProgressReport, ScheduledWorkoutDetail, User, WorkoutPlan,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Error, Debug)]
pub enum StoreError {
    /// Absent, or owned by someone else.
    #[error("Record not found")]
    NotFound,
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid reference: {0}")]
    InvalidReference(String),
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let code = db_err.code().map(|code| code.into_owned());
            match code.as_deref() {
                Some(UNIQUE_VIOLATION) => return StoreError::Conflict(db_err.message().to_string()),
                Some(FOREIGN_KEY_VIOLATION) => {
                    return StoreError::InvalidReference(db_err.message().to_string())
                }
                _ => {}
            }
        }

        StoreError::Database(err)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `Conflict` when the email is taken.
    async fn create_user(&self, user: NewUser) -> StoreResult<User>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
}

#[async_trait]
pub trait ExerciseStore: Send + Sync {
    /// All exercises ordered by name.
    async fn list_exercises(&self) -> StoreResult<Vec<Exercise>>;

    /// All categories ordered by name.
    async fn list_categories(&self) -> StoreResult<Vec<ExerciseCategory>>;
}

#[async_trait]
pub trait WorkoutPlanStore: Send + Sync {
    /// Inserts the plan and all its entries atomically and returns the plan id.
    async fn create_plan(&self, user_id: i32, draft: PlanDraft) -> StoreResult<i32>;

    /// Updates metadata and applies the entry update atomically.
    /// `NotFound` unless the plan exists and belongs to `user_id`.
    async fn update_plan(
        &self,
        plan_id: i32,
        user_id: i32,
        replacement: PlanReplacement,
    ) -> StoreResult<()>;

    /// Deletes the plan; its entries, schedules and logs cascade.
    /// `NotFound` unless the plan exists and belongs to `user_id`.
    async fn delete_plan(&self, plan_id: i32, user_id: i32) -> StoreResult<()>;

    /// Plans newest first, entries by position.
    async fn list_plans(&self, user_id: i32) -> StoreResult<Vec<WorkoutPlan>>;
}

#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// `NotFound` unless the referenced plan belongs to `user_id`.
    async fn schedule_workout(&self, user_id: i32, workout: NewScheduledWorkout)
        -> StoreResult<i32>;

    /// Marks the workout completed and appends its logs atomically.
    /// `NotFound` if it is not the caller's, `Conflict` if already completed.
    async fn complete_workout(
        &self,
        scheduled_workout_id: i32,
        user_id: i32,
        logs: Vec<NewWorkoutLog>,
    ) -> StoreResult<()>;

    async fn get_scheduled_workout(
        &self,
        scheduled_workout_id: i32,
        user_id: i32,
    ) -> StoreResult<ScheduledWorkoutDetail>;
}

#[async_trait]
pub trait ProgressStore: Send + Sync {
    async fn progress_report(&self, user_id: i32) -> StoreResult<ProgressReport>;
}

/// Everything the service needs from persistence.
pub trait Store: UserStore + ExerciseStore + WorkoutPlanStore + ScheduleStore + ProgressStore {}

impl<T> Store for T where
    T: UserStore + ExerciseStore + WorkoutPlanStore + ScheduleStore + ProgressStore
{
}
