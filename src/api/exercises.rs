use axum::{extract::State, middleware, response::Json, routing::get, Router};

use super::routes::AppState;
use crate::auth::{jwt_auth_middleware, UserSession};
use crate::error::AppError;
use crate::models::{Exercise, ExerciseCategory};
use crate::services::ExerciseService;

/// Exercise catalog routes; all require a bearer token.
pub fn exercise_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_exercises))
        .route("/categories", get(list_categories))
        .route_layer(middleware::from_fn_with_state(
            state.auth.clone(),
            jwt_auth_middleware,
        ))
}

#[tracing::instrument(skip_all, fields(user_id = session.user_id))]
async fn list_exercises(
    State(exercises): State<ExerciseService>,
    session: UserSession,
) -> Result<Json<Vec<Exercise>>, AppError> {
    Ok(Json(exercises.list_exercises().await?))
}

#[tracing::instrument(skip_all, fields(user_id = session.user_id))]
async fn list_categories(
    State(exercises): State<ExerciseService>,
    session: UserSession,
) -> Result<Json<Vec<ExerciseCategory>>, AppError> {
    Ok(Json(exercises.list_categories().await?))
}
