use std::sync::Arc;

use validator::Validate;

use crate::error::{AppError, OrNotFound};
use crate::models::{
    LogWorkoutRequest, NewScheduledWorkout, NewWorkoutLog, ScheduleWorkoutRequest,
    ScheduledWorkoutDetail,
};
use crate::store::Store;

const SCHEDULED_WORKOUT_NOT_FOUND: &str = "Scheduled workout not found";

/// Puts plans on the calendar and records what was actually done.
#[derive(Clone)]
pub struct ScheduleService {
    store: Arc<dyn Store>,
}

impl ScheduleService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn schedule_workout(
        &self,
        user_id: i32,
        request: ScheduleWorkoutRequest,
    ) -> Result<i32, AppError> {
        request.validate()?;

        let plan_id = request.workout_plan_id;
        let scheduled_workout_id = self
            .store
            .schedule_workout(user_id, NewScheduledWorkout::from(request))
            .await
            .or_not_found("Workout plan not found")?;

        tracing::info!(user_id, plan_id, scheduled_workout_id, "workout scheduled");
        Ok(scheduled_workout_id)
    }

    /// Marks the workout completed and stores one log per submitted exercise.
    pub async fn log_workout(
        &self,
        user_id: i32,
        request: LogWorkoutRequest,
    ) -> Result<(), AppError> {
        request.validate()?;

        let scheduled_workout_id = request.scheduled_workout_id;
        let logs: Vec<NewWorkoutLog> = request.exercises.into_iter().map(Into::into).collect();
        let log_count = logs.len();

        self.store
            .complete_workout(scheduled_workout_id, user_id, logs)
            .await
            .or_not_found(SCHEDULED_WORKOUT_NOT_FOUND)?;

        tracing::info!(user_id, scheduled_workout_id, log_count, "workout completed");
        Ok(())
    }

    pub async fn get_scheduled_workout(
        &self,
        scheduled_workout_id: i32,
        user_id: i32,
    ) -> Result<ScheduledWorkoutDetail, AppError> {
        self.store
            .get_scheduled_workout(scheduled_workout_id, user_id)
            .await
            .or_not_found(SCHEDULED_WORKOUT_NOT_FOUND)
    }
}
