use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post, put},
    Router,
};
use axum_extra::extract::WithRejection;
use serde::Serialize;

use super::routes::AppState;
use crate::auth::{jwt_auth_middleware, UserSession};
use crate::error::AppError;
use crate::models::{
    LogWorkoutRequest, ProgressRow, ScheduleWorkoutRequest, ScheduledWorkoutDetail, WorkoutPlan,
    WorkoutPlanRequest,
};
use crate::services::{ProgressService, ScheduleService, WorkoutPlanService};

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: i32,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

/// Workout plan, scheduling, logging and progress routes; all require a bearer token.
pub fn workout_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_plans).post(create_plan))
        .route("/:id", put(update_plan).delete(delete_plan))
        .route("/schedule", post(schedule_workout))
        .route("/schedule/:id", get(get_scheduled_workout))
        .route("/log", post(log_workout))
        .route("/progress", get(progress))
        .route_layer(middleware::from_fn_with_state(
            state.auth.clone(),
            jwt_auth_middleware,
        ))
}

#[tracing::instrument(skip_all, fields(user_id = session.user_id))]
async fn list_plans(
    State(plans): State<WorkoutPlanService>,
    session: UserSession,
) -> Result<Json<Vec<WorkoutPlan>>, AppError> {
    Ok(Json(plans.list_plans(session.user_id).await?))
}

#[tracing::instrument(skip_all, fields(user_id = session.user_id))]
async fn create_plan(
    State(plans): State<WorkoutPlanService>,
    session: UserSession,
    WithRejection(Json(request), _): WithRejection<Json<WorkoutPlanRequest>, AppError>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let id = plans.create_plan(session.user_id, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id,
            message: "Workout plan created".to_string(),
        }),
    ))
}

#[tracing::instrument(skip_all, fields(user_id = session.user_id, plan_id = plan_id))]
async fn update_plan(
    State(plans): State<WorkoutPlanService>,
    session: UserSession,
    WithRejection(Path(plan_id), _): WithRejection<Path<i32>, AppError>,
    WithRejection(Json(request), _): WithRejection<Json<WorkoutPlanRequest>, AppError>,
) -> Result<Json<MessageResponse>, AppError> {
    plans.update_plan(plan_id, session.user_id, request).await?;
    Ok(MessageResponse::new("Workout plan updated"))
}

#[tracing::instrument(skip_all, fields(user_id = session.user_id, plan_id = plan_id))]
async fn delete_plan(
    State(plans): State<WorkoutPlanService>,
    session: UserSession,
    WithRejection(Path(plan_id), _): WithRejection<Path<i32>, AppError>,
) -> Result<Json<MessageResponse>, AppError> {
    plans.delete_plan(plan_id, session.user_id).await?;
    Ok(MessageResponse::new("Workout plan deleted successfully"))
}

#[tracing::instrument(skip_all, fields(user_id = session.user_id))]
async fn schedule_workout(
    State(schedules): State<ScheduleService>,
    session: UserSession,
    WithRejection(Json(request), _): WithRejection<Json<ScheduleWorkoutRequest>, AppError>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let id = schedules.schedule_workout(session.user_id, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id,
            message: "Workout scheduled successfully".to_string(),
        }),
    ))
}

#[tracing::instrument(skip_all, fields(user_id = session.user_id))]
async fn get_scheduled_workout(
    State(schedules): State<ScheduleService>,
    session: UserSession,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
) -> Result<Json<ScheduledWorkoutDetail>, AppError> {
    Ok(Json(schedules.get_scheduled_workout(id, session.user_id).await?))
}

#[tracing::instrument(skip_all, fields(user_id = session.user_id))]
async fn log_workout(
    State(schedules): State<ScheduleService>,
    session: UserSession,
    WithRejection(Json(request), _): WithRejection<Json<LogWorkoutRequest>, AppError>,
) -> Result<Json<MessageResponse>, AppError> {
    schedules.log_workout(session.user_id, request).await?;
    Ok(MessageResponse::new("Workout logged successfully"))
}

#[tracing::instrument(skip_all, fields(user_id = session.user_id))]
async fn progress(
    State(progress): State<ProgressService>,
    session: UserSession,
) -> Result<Json<Vec<ProgressRow>>, AppError> {
    Ok(Json(progress.progress(session.user_id).await?))
}
