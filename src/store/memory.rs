use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

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

/// Same rows the catalog migration seeds, in the same id order.
const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    ("Strength", "Exercises focused on building muscle strength"),
    ("Cardio", "Exercises focused on cardiovascular fitness"),
    ("Flexibility", "Exercises focused on improving flexibility"),
];

const DEFAULT_EXERCISES: &[(&str, &str, &str)] = &[
    (
        "Bench Press",
        "A compound exercise that works the chest, shoulders, and triceps",
        "Strength",
    ),
    (
        "Squats",
        "A compound exercise that primarily targets the legs and core",
        "Strength",
    ),
    (
        "Running",
        "Cardiovascular exercise that can be done at various intensities",
        "Cardio",
    ),
    (
        "Yoga Flow",
        "A series of poses that improve flexibility and balance",
        "Flexibility",
    ),
];

#[derive(Debug, Default)]
struct Sequences {
    users: i32,
    categories: i32,
    exercises: i32,
    plans: i32,
    entries: i32,
    scheduled: i32,
    logs: i32,
}

fn next(counter: &mut i32) -> i32 {
    *counter += 1;
    *counter
}

#[derive(Debug, Clone)]
struct StoredLog {
    id: i32,
    scheduled_workout_id: i32,
    log: NewWorkoutLog,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct MemoryState {
    seq: Sequences,
    users: Vec<User>,
    categories: Vec<ExerciseCategory>,
    exercises: Vec<Exercise>,
    plans: Vec<WorkoutPlan>,
    scheduled: Vec<ScheduledWorkout>,
    logs: Vec<StoredLog>,
}

impl MemoryState {
    fn exercise_name(&self, exercise_id: i32) -> Option<&str> {
        self.exercises
            .iter()
            .find(|exercise| exercise.id == exercise_id)
            .map(|exercise| exercise.name.as_str())
    }

    /// Mirrors the foreign key on `exercise_id`: checked before any mutation.
    fn check_exercises(&self, mut ids: impl Iterator<Item = i32>) -> StoreResult<()> {
        match ids.find(|id| self.exercise_name(*id).is_none()) {
            Some(missing) => Err(StoreError::InvalidReference(format!(
                "exercise {} does not exist",
                missing
            ))),
            None => Ok(()),
        }
    }

    fn build_entries(&mut self, entries: &OrderedEntries) -> Vec<PlanExercise> {
        let mut built = Vec::with_capacity(entries.len());
        for entry in entries.iter() {
            let exercise_name = self
                .exercise_name(entry.exercise_id)
                .unwrap_or_default()
                .to_string();
            built.push(PlanExercise {
                id: next(&mut self.seq.entries),
                exercise_id: entry.exercise_id,
                exercise_name,
                sets: entry.sets,
                reps: entry.reps,
                weight: entry.weight,
                notes: entry.notes.clone(),
                order_index: entry.order_index,
            });
        }
        built
    }

    fn owned_plan_mut(&mut self, plan_id: i32, user_id: i32) -> StoreResult<&mut WorkoutPlan> {
        self.plans
            .iter_mut()
            .find(|plan| plan.id == plan_id && plan.user_id == user_id)
            .ok_or(StoreError::NotFound)
    }

    fn to_log(&self, stored: &StoredLog) -> WorkoutLog {
        WorkoutLog {
            id: stored.id,
            scheduled_workout_id: stored.scheduled_workout_id,
            exercise_id: stored.log.exercise_id,
            exercise_name: self
                .exercise_name(stored.log.exercise_id)
                .unwrap_or_default()
                .to_string(),
            sets_completed: stored.log.sets_completed,
            reps_completed: stored.log.reps_completed,
            weight_used: stored.log.weight_used,
            notes: stored.log.notes.clone(),
            created_at: stored.created_at,
        }
    }
}

/// In-process store for tests and local experiments.
///
/// Each operation holds the write lock for its whole duration and validates
/// before it mutates, so a failed call leaves no partial state behind.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    /// An empty store with no catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with the standard exercise catalog.
    pub fn with_default_catalog() -> Self {
        let mut state = MemoryState::default();
        let now = Utc::now();

        for (name, description) in DEFAULT_CATEGORIES {
            let id = next(&mut state.seq.categories);
            state.categories.push(ExerciseCategory {
                id,
                name: name.to_string(),
                description: Some(description.to_string()),
                created_at: now,
            });
        }

        for (name, description, category) in DEFAULT_EXERCISES {
            let Some(category) = state.categories.iter().find(|c| c.name == *category) else {
                continue;
            };
            let (category_id, category_name) = (category.id, category.name.clone());
            let id = next(&mut state.seq.exercises);
            state.exercises.push(Exercise {
                id,
                name: name.to_string(),
                description: Some(description.to_string()),
                category_id,
                category_name,
                created_at: now,
            });
        }

        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let mut state = self.state.write().await;

        if state.users.iter().any(|existing| existing.email == user.email) {
            return Err(StoreError::Conflict(format!(
                "email {} already registered",
                user.email
            )));
        }

        let now = Utc::now();
        let user = User {
            id: next(&mut state.seq.users),
            email: user.email,
            password_hash: user.password_hash,
            full_name: user.full_name,
            created_at: now,
            updated_at: now,
        };
        state.users.push(user.clone());

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|user| user.email == email).cloned())
    }
}

#[async_trait]
impl ExerciseStore for MemoryStore {
    async fn list_exercises(&self) -> StoreResult<Vec<Exercise>> {
        let state = self.state.read().await;
        let mut exercises = state.exercises.clone();
        exercises.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(exercises)
    }

    async fn list_categories(&self) -> StoreResult<Vec<ExerciseCategory>> {
        let state = self.state.read().await;
        let mut categories = state.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }
}

#[async_trait]
impl WorkoutPlanStore for MemoryStore {
    async fn create_plan(&self, user_id: i32, draft: PlanDraft) -> StoreResult<i32> {
        let mut state = self.state.write().await;
        state.check_exercises(draft.entries.exercise_ids())?;

        let now = Utc::now();
        let id = next(&mut state.seq.plans);
        let exercises = state.build_entries(&draft.entries);
        state.plans.push(WorkoutPlan {
            id,
            user_id,
            name: draft.name,
            description: draft.description,
            created_at: now,
            updated_at: now,
            exercises,
        });

        Ok(id)
    }

    async fn update_plan(
        &self,
        plan_id: i32,
        user_id: i32,
        replacement: PlanReplacement,
    ) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.owned_plan_mut(plan_id, user_id)?;

        match replacement.entries {
            EntryListUpdate::ReplaceAll(entries) => {
                state.check_exercises(entries.exercise_ids())?;
                let exercises = state.build_entries(&entries);

                let plan = state.owned_plan_mut(plan_id, user_id)?;
                plan.name = replacement.name;
                plan.description = replacement.description;
                plan.updated_at = Utc::now();
                plan.exercises = exercises;
            }
        }

        Ok(())
    }

    async fn delete_plan(&self, plan_id: i32, user_id: i32) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.owned_plan_mut(plan_id, user_id)?;

        state.plans.retain(|plan| plan.id != plan_id);

        let removed: BTreeSet<i32> = state
            .scheduled
            .iter()
            .filter(|workout| workout.workout_plan_id == plan_id)
            .map(|workout| workout.id)
            .collect();
        state
            .scheduled
            .retain(|workout| workout.workout_plan_id != plan_id);
        state
            .logs
            .retain(|log| !removed.contains(&log.scheduled_workout_id));

        Ok(())
    }

    async fn list_plans(&self, user_id: i32) -> StoreResult<Vec<WorkoutPlan>> {
        let state = self.state.read().await;
        let mut plans: Vec<WorkoutPlan> = state
            .plans
            .iter()
            .filter(|plan| plan.user_id == user_id)
            .cloned()
            .collect();

        plans.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        for plan in &mut plans {
            plan.exercises.sort_by_key(|entry| entry.order_index);
        }

        Ok(plans)
    }
}

#[async_trait]
impl ScheduleStore for MemoryStore {
    async fn schedule_workout(
        &self,
        user_id: i32,
        workout: NewScheduledWorkout,
    ) -> StoreResult<i32> {
        let mut state = self.state.write().await;
        state.owned_plan_mut(workout.workout_plan_id, user_id)?;

        let id = next(&mut state.seq.scheduled);
        state.scheduled.push(ScheduledWorkout {
            id,
            workout_plan_id: workout.workout_plan_id,
            user_id,
            scheduled_for: workout.scheduled_for,
            status: WorkoutStatus::Scheduled,
            completed_at: None,
            notes: workout.notes,
            created_at: Utc::now(),
        });

        Ok(id)
    }

    async fn complete_workout(
        &self,
        scheduled_workout_id: i32,
        user_id: i32,
        logs: Vec<NewWorkoutLog>,
    ) -> StoreResult<()> {
        let mut state = self.state.write().await;

        let status = state
            .scheduled
            .iter()
            .find(|workout| workout.id == scheduled_workout_id && workout.user_id == user_id)
            .map(|workout| workout.status)
            .ok_or(StoreError::NotFound)?;
        if status == WorkoutStatus::Completed {
            return Err(StoreError::Conflict("Workout already completed".to_string()));
        }
        state.check_exercises(logs.iter().map(|log| log.exercise_id))?;

        let now = Utc::now();
        for log in logs {
            let id = next(&mut state.seq.logs);
            state.logs.push(StoredLog {
                id,
                scheduled_workout_id,
                log,
                created_at: now,
            });
        }

        if let Some(workout) = state
            .scheduled
            .iter_mut()
            .find(|workout| workout.id == scheduled_workout_id)
        {
            workout.status = WorkoutStatus::Completed;
            workout.completed_at = Some(now);
        }

        Ok(())
    }

    async fn get_scheduled_workout(
        &self,
        scheduled_workout_id: i32,
        user_id: i32,
    ) -> StoreResult<ScheduledWorkoutDetail> {
        let state = self.state.read().await;

        let workout = state
            .scheduled
            .iter()
            .find(|workout| workout.id == scheduled_workout_id && workout.user_id == user_id)
            .cloned()
            .ok_or(StoreError::NotFound)?;
        let plan_name = state
            .plans
            .iter()
            .find(|plan| plan.id == workout.workout_plan_id)
            .map(|plan| plan.name.clone())
            .ok_or(StoreError::NotFound)?;
        let logs = state
            .logs
            .iter()
            .filter(|log| log.scheduled_workout_id == scheduled_workout_id)
            .map(|log| state.to_log(log))
            .collect();

        Ok(ScheduledWorkoutDetail {
            workout,
            plan_name,
            logs,
        })
    }
}

#[async_trait]
impl ProgressStore for MemoryStore {
    async fn progress_report(&self, user_id: i32) -> StoreResult<ProgressReport> {
        let state = self.state.read().await;

        let mut completed: Vec<&ScheduledWorkout> = state
            .scheduled
            .iter()
            .filter(|workout| workout.user_id == user_id && workout.status == WorkoutStatus::Completed)
            .collect();
        completed.sort_by(|a, b| b.completed_at.cmp(&a.completed_at).then(b.id.cmp(&a.id)));

        let total_workouts = completed.len() as i64;
        let total_exercises_completed = state
            .logs
            .iter()
            .filter(|log| completed.iter().any(|workout| workout.id == log.scheduled_workout_id))
            .count() as i64;

        let mut recent = Vec::new();
        for workout in &completed {
            if recent.len() == RECENT_WORKOUT_LIMIT as usize {
                break;
            }
            let Some(plan) = state.plans.iter().find(|plan| plan.id == workout.workout_plan_id)
            else {
                continue;
            };
            let Some(completed_at) = workout.completed_at else {
                continue;
            };

            let logs: Vec<&StoredLog> = state
                .logs
                .iter()
                .filter(|log| log.scheduled_workout_id == workout.id)
                .collect();
            if logs.is_empty() {
                continue;
            }
            let names: BTreeSet<&str> = logs
                .iter()
                .filter_map(|log| state.exercise_name(log.log.exercise_id))
                .collect();

            recent.push(CompletedWorkoutSummary {
                id: workout.id,
                workout_name: plan.name.clone(),
                completed_at,
                exercises_completed: logs.len() as i64,
                exercises: names.into_iter().collect::<Vec<_>>().join(", "),
            });
        }

        Ok(ProgressReport {
            recent,
            totals: ProgressTotals {
                total_workouts,
                total_exercises_completed,
            },
        })
    }
}
