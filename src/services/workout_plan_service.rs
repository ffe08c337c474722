use std::sync::Arc;

use validator::Validate;

use crate::error::{AppError, OrNotFound};
use crate::models::{PlanDraft, PlanReplacement, WorkoutPlan, WorkoutPlanRequest, MAX_PLAN_ENTRIES};
use crate::store::Store;

const PLAN_NOT_FOUND: &str = "Workout plan not found";

#[derive(Clone)]
pub struct WorkoutPlanService {
    store: Arc<dyn Store>,
}

impl WorkoutPlanService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Creates a plan with its entries positioned in submission order.
    pub async fn create_plan(
        &self,
        user_id: i32,
        request: WorkoutPlanRequest,
    ) -> Result<i32, AppError> {
        check_request(&request)?;

        let draft = PlanDraft::from(request);
        let entry_count = draft.entries.len();
        let plan_id = self.store.create_plan(user_id, draft).await?;

        tracing::info!(user_id, plan_id, entry_count, "workout plan created");
        Ok(plan_id)
    }

    /// Replaces the plan's metadata and its whole entry list.
    pub async fn update_plan(
        &self,
        plan_id: i32,
        user_id: i32,
        request: WorkoutPlanRequest,
    ) -> Result<(), AppError> {
        check_request(&request)?;

        self.store
            .update_plan(plan_id, user_id, PlanReplacement::from(request))
            .await
            .or_not_found(PLAN_NOT_FOUND)?;

        tracing::info!(user_id, plan_id, "workout plan updated");
        Ok(())
    }

    pub async fn delete_plan(&self, plan_id: i32, user_id: i32) -> Result<(), AppError> {
        self.store
            .delete_plan(plan_id, user_id)
            .await
            .or_not_found(PLAN_NOT_FOUND)?;

        tracing::info!(user_id, plan_id, "workout plan deleted");
        Ok(())
    }

    pub async fn list_plans(&self, user_id: i32) -> Result<Vec<WorkoutPlan>, AppError> {
        Ok(self.store.list_plans(user_id).await?)
    }
}

fn check_request(request: &WorkoutPlanRequest) -> Result<(), AppError> {
    request.validate()?;

    if request.exercises.len() > MAX_PLAN_ENTRIES {
        return Err(AppError::Validation(format!(
            "A workout plan can hold at most {} exercises",
            MAX_PLAN_ENTRIES
        )));
    }

    Ok(())
}
