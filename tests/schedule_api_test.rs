mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{log_body, TestApp};

#[cfg(test)]
mod schedule_api_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_schedule_and_fetch() {
        let app = TestApp::new();
        let token = app.register("schedule@example.com").await;
        let plan_id = app.create_plan(&token, "Leg Day", &[2]).await;

        let (status, body) = app
            .post(
                "/api/workouts/schedule",
                &token,
                json!({
                    "workoutPlanId": plan_id,
                    "scheduledFor": "2024-03-01T07:30:00.000Z",
                    "notes": "Morning session"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Workout scheduled successfully");
        let id = body["id"].as_i64().unwrap();

        let (status, detail) = app.get(&format!("/api/workouts/schedule/{}", id), &token).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(detail["id"], id);
        assert_eq!(detail["workout_plan_id"], plan_id);
        assert_eq!(detail["status"], "scheduled");
        assert_eq!(detail["plan_name"], "Leg Day");
        assert_eq!(detail["notes"], "Morning session");
        assert!(detail["completed_at"].is_null());
        assert_eq!(detail["logs"], json!([]));
    }

    #[tokio::test]
    async fn test_cannot_schedule_someone_elses_plan() {
        let app = TestApp::new();
        let owner = app.register("owner@example.com").await;
        let intruder = app.register("intruder@example.com").await;
        let plan_id = app.create_plan(&owner, "Private", &[1]).await;

        let (status, body) = app
            .post(
                "/api/workouts/schedule",
                &intruder,
                json!({ "workoutPlanId": plan_id, "scheduledFor": "2024-03-01T07:30:00Z" }),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Workout plan not found");
    }

    #[tokio::test]
    async fn test_invalid_schedule_timestamp() {
        let app = TestApp::new();
        let token = app.register("time@example.com").await;
        let plan_id = app.create_plan(&token, "Plan", &[1]).await;

        let (status, _) = app
            .post(
                "/api/workouts/schedule",
                &token,
                json!({ "workoutPlanId": plan_id, "scheduledFor": "next tuesday" }),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_logging_completes_the_workout() {
        let app = TestApp::new();
        let token = app.register("log@example.com").await;
        let plan_id = app.create_plan(&token, "Leg Day", &[2, 3]).await;
        let id = app.schedule(&token, plan_id).await;

        let (status, body) = app
            .post("/api/workouts/log", &token, log_body(id, &[2, 3, 2]))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Workout logged successfully");

        let (_, detail) = app.get(&format!("/api/workouts/schedule/{}", id), &token).await;
        assert_eq!(detail["status"], "completed");
        assert!(detail["completed_at"].is_string());

        let logs = detail["logs"].as_array().unwrap();
        assert_eq!(logs.len(), 3);
        let names: Vec<&str> = logs
            .iter()
            .map(|log| log["exercise_name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Squats", "Running", "Squats"]);
        assert_eq!(logs[0]["sets_completed"], 3);
    }

    #[tokio::test]
    async fn test_logging_twice_conflicts() {
        let app = TestApp::new();
        let token = app.register("twice@example.com").await;
        let plan_id = app.create_plan(&token, "Plan", &[1]).await;
        let id = app.schedule(&token, plan_id).await;

        let (status, _) = app.post("/api/workouts/log", &token, log_body(id, &[1])).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = app.post("/api/workouts/log", &token, log_body(id, &[1, 1])).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Workout already completed");

        let (_, detail) = app.get(&format!("/api/workouts/schedule/{}", id), &token).await;
        assert_eq!(detail["logs"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_other_users_workout_is_not_found() {
        let app = TestApp::new();
        let owner = app.register("owner@example.com").await;
        let intruder = app.register("intruder@example.com").await;
        let plan_id = app.create_plan(&owner, "Plan", &[1]).await;
        let id = app.schedule(&owner, plan_id).await;

        let (status, body) = app.post("/api/workouts/log", &intruder, log_body(id, &[1])).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Scheduled workout not found");

        let (status, _) = app.get(&format!("/api/workouts/schedule/{}", id), &intruder).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, detail) = app.get(&format!("/api/workouts/schedule/{}", id), &owner).await;
        assert_eq!(detail["status"], "scheduled");
    }

    #[tokio::test]
    async fn test_logging_unknown_exercise_leaves_workout_scheduled() {
        let app = TestApp::new();
        let token = app.register("badlog@example.com").await;
        let plan_id = app.create_plan(&token, "Plan", &[1]).await;
        let id = app.schedule(&token, plan_id).await;

        let (status, _) = app.post("/api/workouts/log", &token, log_body(id, &[1, 999])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, detail) = app.get(&format!("/api/workouts/schedule/{}", id), &token).await;
        assert_eq!(detail["status"], "scheduled");
        assert_eq!(detail["logs"], json!([]));
    }

    #[tokio::test]
    async fn test_empty_progress() {
        let app = TestApp::new();
        let token = app.register("fresh@example.com").await;

        let (status, body) = app.get("/api/workouts/progress", &token).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_progress_report() {
        let app = TestApp::new();
        let token = app.register("progress@example.com").await;
        let other = app.register("other@example.com").await;

        let legs = app.create_plan(&token, "Leg Day", &[2, 3]).await;
        let push = app.create_plan(&token, "Push Day", &[1]).await;

        let first = app.schedule(&token, legs).await;
        app.post("/api/workouts/log", &token, log_body(first, &[3, 2, 3])).await;
        let second = app.schedule(&token, push).await;
        app.post("/api/workouts/log", &token, log_body(second, &[1])).await;
        // Scheduled but never logged: not part of the report.
        app.schedule(&token, legs).await;

        let other_plan = app.create_plan(&other, "Other", &[4]).await;
        let other_workout = app.schedule(&other, other_plan).await;
        app.post("/api/workouts/log", &other, log_body(other_workout, &[4])).await;

        let (status, body) = app.get("/api/workouts/progress", &token).await;
        assert_eq!(status, StatusCode::OK);

        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0]["id"], second);
        assert_eq!(rows[0]["workout_name"], "Push Day");
        assert_eq!(rows[0]["exercises_completed"], 1);
        assert_eq!(rows[0]["exercises"], "Bench Press");

        assert_eq!(rows[1]["id"], first);
        assert_eq!(rows[1]["workout_name"], "Leg Day");
        assert_eq!(rows[1]["exercises_completed"], 3);
        assert_eq!(rows[1]["exercises"], "Running, Squats");

        for row in rows {
            assert_eq!(row["total_workouts"], 2);
            assert_eq!(row["total_exercises_completed"], 4);
        }
    }

    #[tokio::test]
    async fn test_progress_lists_ten_most_recent() {
        let app = TestApp::new();
        let token = app.register("busy@example.com").await;
        let plan_id = app.create_plan(&token, "Daily", &[3]).await;

        let mut ids = Vec::new();
        for _ in 0..12 {
            let id = app.schedule(&token, plan_id).await;
            app.post("/api/workouts/log", &token, log_body(id, &[3])).await;
            ids.push(id);
        }

        let (_, body) = app.get("/api/workouts/progress", &token).await;
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0]["id"], ids[11]);
        assert_eq!(rows[9]["id"], ids[2]);
        assert_eq!(rows[0]["total_workouts"], 12);
        assert_eq!(rows[0]["total_exercises_completed"], 12);
    }

    #[tokio::test]
    async fn test_progress_skips_workouts_logged_without_exercises() {
        let app = TestApp::new();
        let token = app.register("skipper@example.com").await;
        let plan_id = app.create_plan(&token, "Daily", &[3]).await;

        let empty = app.schedule(&token, plan_id).await;
        let (status, _) = app.post("/api/workouts/log", &token, log_body(empty, &[])).await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = app.get("/api/workouts/progress", &token).await;
        assert_eq!(body, json!([]));

        let mut ids = Vec::new();
        for _ in 0..10 {
            let id = app.schedule(&token, plan_id).await;
            app.post("/api/workouts/log", &token, log_body(id, &[3])).await;
            ids.push(id);
        }
        let newest_empty = app.schedule(&token, plan_id).await;
        app.post("/api/workouts/log", &token, log_body(newest_empty, &[])).await;

        let (_, body) = app.get("/api/workouts/progress", &token).await;
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0]["id"], ids[9]);
        assert_eq!(rows[9]["id"], ids[0]);
        assert_eq!(rows[0]["total_workouts"], 12);
        assert_eq!(rows[0]["total_exercises_completed"], 10);
    }
}
