use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgTypeInfo, PgValueRef};
use sqlx::{Decode, FromRow, Postgres, Type};
use thiserror::Error;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutStatus {
    Scheduled,
    Completed,
}

impl WorkoutStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutStatus::Scheduled => "scheduled",
            WorkoutStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for WorkoutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown workout status: {0}")]
pub struct UnknownWorkoutStatus(String);

impl FromStr for WorkoutStatus {
    type Err = UnknownWorkoutStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(WorkoutStatus::Scheduled),
            "completed" => Ok(WorkoutStatus::Completed),
            other => Err(UnknownWorkoutStatus(other.to_string())),
        }
    }
}

// Stored as plain text so the column stays readable from psql.
impl Type<Postgres> for WorkoutStatus {
    fn type_info() -> PgTypeInfo {
        <String as Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <String as Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for WorkoutStatus {
    fn decode(value: PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let raw = <&str as Decode<Postgres>>::decode(value)?;
        Ok(raw.parse()?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScheduledWorkout {
    pub id: i32,
    pub workout_plan_id: i32,
    pub user_id: i32,
    pub scheduled_for: DateTime<Utc>,
    pub status: WorkoutStatus,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkoutLog {
    pub id: i32,
    pub scheduled_workout_id: i32,
    pub exercise_id: i32,
    pub exercise_name: String,
    pub sets_completed: Option<i32>,
    pub reps_completed: Option<i32>,
    pub weight_used: Option<f64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A scheduled workout together with its plan name and recorded logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledWorkoutDetail {
    #[serde(flatten)]
    pub workout: ScheduledWorkout,
    pub plan_name: String,
    pub logs: Vec<WorkoutLog>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleWorkoutRequest {
    #[validate(range(min = 1))]
    pub workout_plan_id: i32,
    pub scheduled_for: DateTime<Utc>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoggedExerciseInput {
    #[validate(range(min = 1))]
    pub exercise_id: i32,
    #[validate(range(min = 0, max = 100))]
    pub sets_completed: Option<i32>,
    #[validate(range(min = 0, max = 1000))]
    pub reps_completed: Option<i32>,
    #[validate(range(min = 0.0))]
    pub weight_used: Option<f64>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LogWorkoutRequest {
    #[validate(range(min = 1))]
    pub scheduled_workout_id: i32,
    #[validate(nested)]
    pub exercises: Vec<LoggedExerciseInput>,
}

#[derive(Debug, Clone)]
pub struct NewScheduledWorkout {
    pub workout_plan_id: i32,
    pub scheduled_for: DateTime<Utc>,
    pub notes: Option<String>,
}

impl From<ScheduleWorkoutRequest> for NewScheduledWorkout {
    fn from(request: ScheduleWorkoutRequest) -> Self {
        Self {
            workout_plan_id: request.workout_plan_id,
            scheduled_for: request.scheduled_for,
            notes: request.notes,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkoutLog {
    pub exercise_id: i32,
    pub sets_completed: Option<i32>,
    pub reps_completed: Option<i32>,
    pub weight_used: Option<f64>,
    pub notes: Option<String>,
}

impl From<LoggedExerciseInput> for NewWorkoutLog {
    fn from(input: LoggedExerciseInput) -> Self {
        Self {
            exercise_id: input.exercise_id,
            sets_completed: input.sets_completed,
            reps_completed: input.reps_completed,
            weight_used: input.weight_used,
            notes: input.notes,
        }
    }
}
