use std::sync::Arc;

use crate::error::AppError;
use crate::models::{Exercise, ExerciseCategory};
use crate::store::Store;

/// Read-only access to the seeded exercise catalog.
#[derive(Clone)]
pub struct ExerciseService {
    store: Arc<dyn Store>,
}

impl ExerciseService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn list_exercises(&self) -> Result<Vec<Exercise>, AppError> {
        Ok(self.store.list_exercises().await?)
    }

    pub async fn list_categories(&self) -> Result<Vec<ExerciseCategory>, AppError> {
        Ok(self.store.list_categories().await?)
    }
}
