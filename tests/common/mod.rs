#![allow(dead_code)]

use std::sync::{Arc, Once};

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use tower::ServiceExt;

use workout_tracker::api::{create_routes, AppState};
use workout_tracker::auth::{AuthConfig, MIN_BCRYPT_COST};
use workout_tracker::store::{MemoryStore, Store};

pub const TEST_JWT_SECRET: &str = "test_secret_key_for_testing_only";
pub const TEST_PASSWORD: &str = "SecurePassword123!";

pub static TEST_AUTH_CONFIG: Lazy<AuthConfig> = Lazy::new(|| AuthConfig {
    jwt_secret: TEST_JWT_SECRET.to_string(),
    token_ttl: chrono::Duration::hours(1),
    bcrypt_cost: MIN_BCRYPT_COST,
});

static INIT: Once = Once::new();

/// Initialize test logging
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("workout_tracker=debug")
            .with_test_writer()
            .try_init();
    });
}

/// The full router over an isolated store.
pub struct TestApp {
    router: Router,
}

impl TestApp {
    /// Fresh in-memory store seeded with the exercise catalog.
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::with_default_catalog()))
    }

    pub fn with_store(store: Arc<dyn Store>) -> Self {
        init_test_logging();
        Self {
            router: create_routes(AppState::new(store, &TEST_AUTH_CONFIG)),
        }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        self.dispatch(request).await
    }

    pub async fn dispatch(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, body)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, Some(token), None).await
    }

    /// Registers `email` and returns its bearer token.
    pub async fn register(&self, email: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({
                    "email": email,
                    "password": TEST_PASSWORD,
                    "fullName": "Test User"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

        body["token"].as_str().unwrap().to_string()
    }

    /// Creates a plan from exercise ids and returns its id.
    pub async fn create_plan(&self, token: &str, name: &str, exercise_ids: &[i32]) -> i64 {
        let (status, body) = self
            .post("/api/workouts", token, plan_body(name, exercise_ids))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create plan failed: {}", body);

        body["id"].as_i64().unwrap()
    }

    /// Plans as listed for the token's user.
    pub async fn plans(&self, token: &str) -> Vec<Value> {
        let (status, body) = self.get("/api/workouts", token).await;
        assert_eq!(status, StatusCode::OK);

        body.as_array().unwrap().clone()
    }

    pub async fn schedule(&self, token: &str, plan_id: i64) -> i64 {
        let (status, body) = self
            .post(
                "/api/workouts/schedule",
                token,
                json!({
                    "workoutPlanId": plan_id,
                    "scheduledFor": "2024-03-01T07:30:00.000Z",
                    "notes": "Morning session"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "schedule failed: {}", body);

        body["id"].as_i64().unwrap()
    }
}

pub fn plan_body(name: &str, exercise_ids: &[i32]) -> Value {
    let exercises: Vec<Value> = exercise_ids
        .iter()
        .map(|id| json!({ "exerciseId": id, "sets": 3, "reps": 10 }))
        .collect();

    json!({ "name": name, "exercises": exercises })
}

pub fn log_body(scheduled_workout_id: i64, exercise_ids: &[i32]) -> Value {
    let exercises: Vec<Value> = exercise_ids
        .iter()
        .map(|id| json!({ "exerciseId": id, "setsCompleted": 3, "repsCompleted": 10 }))
        .collect();

    json!({ "scheduledWorkoutId": scheduled_workout_id, "exercises": exercises })
}

/// `(exercise_id, order_index)` pairs of a listed plan.
pub fn entry_positions(plan: &Value) -> Vec<(i64, i64)> {
    plan["exercises"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| {
            (
                entry["exercise_id"].as_i64().unwrap(),
                entry["order_index"].as_i64().unwrap(),
            )
        })
        .collect()
}

pub fn find_plan(plans: &[Value], id: i64) -> Option<&Value> {
    plans.iter().find(|plan| plan["id"].as_i64() == Some(id))
}
