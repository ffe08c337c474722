use std::sync::Arc;

use crate::error::AppError;
use crate::models::ProgressRow;
use crate::store::Store;

#[derive(Clone)]
pub struct ProgressService {
    store: Arc<dyn Store>,
}

impl ProgressService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Recent completed workouts, each row carrying the lifetime totals.
    pub async fn progress(&self, user_id: i32) -> Result<Vec<ProgressRow>, AppError> {
        let report = self.store.progress_report(user_id).await?;
        Ok(report.into_rows())
    }
}
