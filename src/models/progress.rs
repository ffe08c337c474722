use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// How many completed workouts the report lists individually.
pub const RECENT_WORKOUT_LIMIT: i64 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CompletedWorkoutSummary {
    pub id: i32,
    pub workout_name: String,
    pub completed_at: DateTime<Utc>,
    pub exercises_completed: i64,
    /// Distinct exercise names, alphabetical, joined with ", ".
    pub exercises: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ProgressTotals {
    pub total_workouts: i64,
    pub total_exercises_completed: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressReport {
    pub recent: Vec<CompletedWorkoutSummary>,
    pub totals: ProgressTotals,
}

/// One row of `GET /api/workouts/progress`: a recent workout plus the lifetime totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRow {
    #[serde(flatten)]
    pub workout: CompletedWorkoutSummary,
    #[serde(flatten)]
    pub totals: ProgressTotals,
}

impl ProgressReport {
    pub fn into_rows(self) -> Vec<ProgressRow> {
        let totals = self.totals;
        self.recent
            .into_iter()
            .map(|workout| ProgressRow { workout, totals })
            .collect()
    }
}
