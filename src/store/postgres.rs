use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgConnection, PgPool};

use super::{
    ExerciseStore, ProgressStore, ScheduleStore, StoreError, StoreResult, UserStore,
    WorkoutPlanStore,
};
use crate::models::{
    CompletedWorkoutSummary, EntryListUpdate, Exercise, ExerciseCategory, NewScheduledWorkout,
    NewUser, NewWorkoutLog, OrderedEntries, PlanDraft, PlanExercise, PlanReplacement,
    ProgressReport, ProgressTotals, ScheduledWorkout, ScheduledWorkoutDetail, User, WorkoutLog,
    WorkoutPlan, WorkoutStatus, RECENT_WORKOUT_LIMIT,
};

/// PostgreSQL-backed store. Multi-statement writes each run in one transaction;
/// an early return drops the transaction, which rolls it back.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(Debug, FromRow)]
struct PlanRow {
    id: i32,
    user_id: i32,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    exercises: Json<Vec<PlanExercise>>,
}

impl From<PlanRow> for WorkoutPlan {
    fn from(row: PlanRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
            exercises: row.exercises.0,
        }
    }
}

#[derive(Debug, FromRow)]
struct ScheduledWorkoutRow {
    #[sqlx(flatten)]
    workout: ScheduledWorkout,
    plan_name: String,
}

async fn insert_entries(
    conn: &mut PgConnection,
    plan_id: i32,
    entries: &OrderedEntries,
) -> StoreResult<()> {
    for entry in entries.iter() {
        sqlx::query(
            "INSERT INTO workout_exercises
             (workout_plan_id, exercise_id, sets, reps, weight, notes, order_index)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(plan_id)
        .bind(entry.exercise_id)
        .bind(entry.sets)
        .bind(entry.reps)
        .bind(entry.weight)
        .bind(&entry.notes)
        .bind(entry.order_index)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (email, password_hash, full_name)
             VALUES ($1, $2, $3)
             RETURNING id, email, password_hash, full_name, created_at, updated_at",
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, full_name, created_at, updated_at
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

#[async_trait]
impl ExerciseStore for PgStore {
    async fn list_exercises(&self) -> StoreResult<Vec<Exercise>> {
        let exercises = sqlx::query_as::<_, Exercise>(
            "SELECT e.id, e.name, e.description, e.category_id, ec.name AS category_name, e.created_at
             FROM exercises e
             JOIN exercise_categories ec ON e.category_id = ec.id
             ORDER BY e.name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(exercises)
    }

    async fn list_categories(&self) -> StoreResult<Vec<ExerciseCategory>> {
        let categories = sqlx::query_as::<_, ExerciseCategory>(
            "SELECT id, name, description, created_at FROM exercise_categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }
}

#[async_trait]
impl WorkoutPlanStore for PgStore {
    async fn create_plan(&self, user_id: i32, draft: PlanDraft) -> StoreResult<i32> {
        let mut tx = self.pool.begin().await?;

        let plan_id: i32 = sqlx::query_scalar(
            "INSERT INTO workout_plans (user_id, name, description)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(user_id)
        .bind(&draft.name)
        .bind(&draft.description)
        .fetch_one(&mut *tx)
        .await?;

        insert_entries(&mut *tx, plan_id, &draft.entries).await?;

        tx.commit().await?;
        Ok(plan_id)
    }

    async fn update_plan(
        &self,
        plan_id: i32,
        user_id: i32,
        replacement: PlanReplacement,
    ) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        // The ownership check and the write share one statement.
        let updated = sqlx::query(
            "UPDATE workout_plans
             SET name = $1, description = $2, updated_at = NOW()
             WHERE id = $3 AND user_id = $4",
        )
        .bind(&replacement.name)
        .bind(&replacement.description)
        .bind(plan_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        match replacement.entries {
            EntryListUpdate::ReplaceAll(entries) => {
                sqlx::query("DELETE FROM workout_exercises WHERE workout_plan_id = $1")
                    .bind(plan_id)
                    .execute(&mut *tx)
                    .await?;

                insert_entries(&mut *tx, plan_id, &entries).await?;
            }
        }

        tx.commit().await?;
        Ok(())
    }

    async fn delete_plan(&self, plan_id: i32, user_id: i32) -> StoreResult<()> {
        let deleted = sqlx::query("DELETE FROM workout_plans WHERE id = $1 AND user_id = $2")
            .bind(plan_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn list_plans(&self, user_id: i32) -> StoreResult<Vec<WorkoutPlan>> {
        let rows = sqlx::query_as::<_, PlanRow>(
            r#"
            SELECT
                wp.id, wp.user_id, wp.name, wp.description, wp.created_at, wp.updated_at,
                COALESCE(
                    json_agg(
                        json_build_object(
                            'id', we.id,
                            'exercise_id', we.exercise_id,
                            'exercise_name', e.name,
                            'sets', we.sets,
                            'reps', we.reps,
                            'weight', we.weight,
                            'notes', we.notes,
                            'order_index', we.order_index
                        ) ORDER BY we.order_index
                    ) FILTER (WHERE we.id IS NOT NULL),
                    '[]'::json
                ) AS exercises
            FROM workout_plans wp
            LEFT JOIN workout_exercises we ON wp.id = we.workout_plan_id
            LEFT JOIN exercises e ON we.exercise_id = e.id
            WHERE wp.user_id = $1
            GROUP BY wp.id
            ORDER BY wp.created_at DESC, wp.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(WorkoutPlan::from).collect())
    }
}

#[async_trait]
impl ScheduleStore for PgStore {
    async fn schedule_workout(
        &self,
        user_id: i32,
        workout: NewScheduledWorkout,
    ) -> StoreResult<i32> {
        // Inserts nothing unless the plan belongs to the caller.
        let id: Option<i32> = sqlx::query_scalar(
            "INSERT INTO scheduled_workouts (workout_plan_id, user_id, scheduled_for, notes)
             SELECT wp.id, $2, $3, $4
             FROM workout_plans wp
             WHERE wp.id = $1 AND wp.user_id = $2
             RETURNING id",
        )
        .bind(workout.workout_plan_id)
        .bind(user_id)
        .bind(workout.scheduled_for)
        .bind(&workout.notes)
        .fetch_optional(&self.pool)
        .await?;

        id.ok_or(StoreError::NotFound)
    }

    async fn complete_workout(
        &self,
        scheduled_workout_id: i32,
        user_id: i32,
        logs: Vec<NewWorkoutLog>,
    ) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        let completed: Option<i32> = sqlx::query_scalar(
            "UPDATE scheduled_workouts
             SET status = $3, completed_at = NOW()
             WHERE id = $1 AND user_id = $2 AND status = $4
             RETURNING id",
        )
        .bind(scheduled_workout_id)
        .bind(user_id)
        .bind(WorkoutStatus::Completed.as_str())
        .bind(WorkoutStatus::Scheduled.as_str())
        .fetch_optional(&mut *tx)
        .await?;

        if completed.is_none() {
            let status: Option<WorkoutStatus> = sqlx::query_scalar(
                "SELECT status FROM scheduled_workouts WHERE id = $1 AND user_id = $2",
            )
            .bind(scheduled_workout_id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;

            return Err(match status {
                Some(_) => StoreError::Conflict("Workout already completed".to_string()),
                None => StoreError::NotFound,
            });
        }

        for log in &logs {
            sqlx::query(
                "INSERT INTO workout_logs
                 (scheduled_workout_id, exercise_id, sets_completed, reps_completed, weight_used, notes)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(scheduled_workout_id)
            .bind(log.exercise_id)
            .bind(log.sets_completed)
            .bind(log.reps_completed)
            .bind(log.weight_used)
            .bind(&log.notes)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn get_scheduled_workout(
        &self,
        scheduled_workout_id: i32,
        user_id: i32,
    ) -> StoreResult<ScheduledWorkoutDetail> {
        // Both reads see one snapshot so status and logs agree.
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query_as::<_, ScheduledWorkoutRow>(
            "SELECT sw.id, sw.workout_plan_id, sw.user_id, sw.scheduled_for, sw.status,
                    sw.completed_at, sw.notes, sw.created_at, wp.name AS plan_name
             FROM scheduled_workouts sw
             JOIN workout_plans wp ON sw.workout_plan_id = wp.id
             WHERE sw.id = $1 AND sw.user_id = $2",
        )
        .bind(scheduled_workout_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StoreError::NotFound)?;

        let logs = sqlx::query_as::<_, WorkoutLog>(
            "SELECT wl.id, wl.scheduled_workout_id, wl.exercise_id, e.name AS exercise_name,
                    wl.sets_completed, wl.reps_completed, wl.weight_used, wl.notes, wl.created_at
             FROM workout_logs wl
             JOIN exercises e ON wl.exercise_id = e.id
             WHERE wl.scheduled_workout_id = $1
             ORDER BY wl.id",
        )
        .bind(scheduled_workout_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(ScheduledWorkoutDetail {
            workout: row.workout,
            plan_name: row.plan_name,
            logs,
        })
    }
}

#[async_trait]
impl ProgressStore for PgStore {
    async fn progress_report(&self, user_id: i32) -> StoreResult<ProgressReport> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        // Completed workouts without logs count toward the totals only.
        let recent = sqlx::query_as::<_, CompletedWorkoutSummary>(
            r#"
            SELECT
                sw.id,
                wp.name AS workout_name,
                sw.completed_at,
                COUNT(wl.id) AS exercises_completed,
                STRING_AGG(DISTINCT e.name, ', ' ORDER BY e.name) AS exercises
            FROM scheduled_workouts sw
            JOIN workout_plans wp ON sw.workout_plan_id = wp.id
            JOIN workout_logs wl ON sw.id = wl.scheduled_workout_id
            JOIN exercises e ON wl.exercise_id = e.id
            WHERE sw.user_id = $1 AND sw.status = 'completed'
            GROUP BY sw.id, wp.name, sw.completed_at
            ORDER BY sw.completed_at DESC, sw.id DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(RECENT_WORKOUT_LIMIT)
        .fetch_all(&mut *tx)
        .await?;

        let totals = sqlx::query_as::<_, ProgressTotals>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM scheduled_workouts
                 WHERE user_id = $1 AND status = 'completed') AS total_workouts,
                (SELECT COUNT(*) FROM workout_logs wl
                 JOIN scheduled_workouts sw ON wl.scheduled_workout_id = sw.id
                 WHERE sw.user_id = $1) AS total_exercises_completed
            "#,
        )
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(ProgressReport { recent, totals })
    }
}
