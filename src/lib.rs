//! Workout tracking REST service: accounts, an exercise catalog, workout plans,
//! scheduling with completion logs, and progress reporting over PostgreSQL.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

pub use error::AppError;
