// API routes and handlers

pub mod auth;
pub mod exercises;
pub mod health;
pub mod routes;
pub mod workouts;

pub use routes::{create_routes, AppState};
