use std::sync::Arc;

use axum::{
    extract::FromRef,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde_json::json;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::auth::auth_routes;
use super::exercises::exercise_routes;
use super::health::health_check;
use super::workouts::workout_routes;
use crate::auth::{AuthConfig, AuthService};
use crate::services::{ExerciseService, ProgressService, ScheduleService, WorkoutPlanService};
use crate::store::Store;

/// Shared handles for every handler, all built over one injected store.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub exercises: ExerciseService,
    pub plans: WorkoutPlanService,
    pub schedules: ScheduleService,
    pub progress: ProgressService,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, auth_config: &AuthConfig) -> Self {
        Self {
            auth: AuthService::new(store.clone(), auth_config),
            exercises: ExerciseService::new(store.clone()),
            plans: WorkoutPlanService::new(store.clone()),
            schedules: ScheduleService::new(store.clone()),
            progress: ProgressService::new(store),
        }
    }
}

impl FromRef<AppState> for AuthService {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

impl FromRef<AppState> for ExerciseService {
    fn from_ref(state: &AppState) -> Self {
        state.exercises.clone()
    }
}

impl FromRef<AppState> for WorkoutPlanService {
    fn from_ref(state: &AppState) -> Self {
        state.plans.clone()
    }
}

impl FromRef<AppState> for ScheduleService {
    fn from_ref(state: &AppState) -> Self {
        state.schedules.clone()
    }
}

impl FromRef<AppState> for ProgressService {
    fn from_ref(state: &AppState) -> Self {
        state.progress.clone()
    }
}

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", auth_routes())
        .nest("/api/exercises", exercise_routes(&state))
        .nest("/api/workouts", workout_routes(&state))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not Found" })))
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
