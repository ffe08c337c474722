use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Upper bound on the number of entries a single plan may carry.
pub const MAX_PLAN_ENTRIES: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutPlan {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub exercises: Vec<PlanExercise>,
}

/// One entry of a plan as stored, ordered by `order_index`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanExercise {
    pub id: i32,
    pub exercise_id: i32,
    pub exercise_name: String,
    pub sets: Option<i32>,
    pub reps: Option<i32>,
    pub weight: Option<f64>,
    pub notes: Option<String>,
    pub order_index: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutExerciseInput {
    #[validate(range(min = 1, message = "exerciseId must be a positive id"))]
    pub exercise_id: i32,
    #[validate(range(min = 0, max = 100))]
    pub sets: Option<i32>,
    #[validate(range(min = 0, max = 1000))]
    pub reps: Option<i32>,
    #[validate(range(min = 0.0))]
    pub weight: Option<f64>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

/// Body of both `POST /api/workouts` and `PUT /api/workouts/:id`.
///
/// `exercises` has no default: an update must always carry the complete
/// desired list, so a missing array is rejected instead of clearing the plan.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct WorkoutPlanRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(nested)]
    pub exercises: Vec<WorkoutExerciseInput>,
}

/// An entry with its position fixed.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedEntry {
    pub exercise_id: i32,
    pub sets: Option<i32>,
    pub reps: Option<i32>,
    pub weight: Option<f64>,
    pub notes: Option<String>,
    pub order_index: i32,
}

/// Entries in submission order with contiguous positions `0..n-1`.
///
/// The only constructor assigns positions from the submitted order, so a
/// value of this type can never hold gaps or duplicates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderedEntries(Vec<PositionedEntry>);

impl OrderedEntries {
    pub fn from_submission(inputs: Vec<WorkoutExerciseInput>) -> Self {
        let entries = inputs
            .into_iter()
            .enumerate()
            .map(|(index, input)| PositionedEntry {
                exercise_id: input.exercise_id,
                sets: input.sets,
                reps: input.reps,
                weight: input.weight,
                notes: input.notes,
                order_index: index as i32,
            })
            .collect();

        Self(entries)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PositionedEntry> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn exercise_ids(&self) -> impl Iterator<Item = i32> + '_ {
        self.0.iter().map(|entry| entry.exercise_id)
    }
}

/// How a plan's entry list changes on update.
///
/// Only full replacement exists today. A partial patch would be a separate
/// variant rather than a different reading of `ReplaceAll`.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum EntryListUpdate {
    /// Delete every existing entry and insert these in their order.
    ReplaceAll(OrderedEntries),
}

/// A validated plan to create.
#[derive(Debug, Clone)]
pub struct PlanDraft {
    pub name: String,
    pub description: Option<String>,
    pub entries: OrderedEntries,
}

/// A validated update to an existing plan.
#[derive(Debug, Clone)]
pub struct PlanReplacement {
    pub name: String,
    pub description: Option<String>,
    pub entries: EntryListUpdate,
}

impl From<WorkoutPlanRequest> for PlanDraft {
    fn from(request: WorkoutPlanRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            entries: OrderedEntries::from_submission(request.exercises),
        }
    }
}

impl From<WorkoutPlanRequest> for PlanReplacement {
    fn from(request: WorkoutPlanRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            entries: EntryListUpdate::ReplaceAll(OrderedEntries::from_submission(request.exercises)),
        }
    }
}
