use anyhow::{bail, Result};
use chrono::Duration;
use std::env;

use crate::auth::{AuthConfig, MAX_BCRYPT_COST, MIN_BCRYPT_COST};

pub const DEFAULT_JWT_SECRET: &str = "your-secret-key-change-in-production";
/// One year.
pub const MAX_JWT_EXPIRES_IN_HOURS: i64 = 24 * 365;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub log_level: String,
    pub jwt_secret: String,
    pub jwt_expires_in_hours: i64,
    pub bcrypt_cost: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            environment: "development".to_string(),
            log_level: "info".to_string(),
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            jwt_expires_in_hours: 24,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let host = env::var("HOST").unwrap_or(defaults.host);
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .unwrap_or(defaults.port);
        let environment = env::var("ENVIRONMENT").unwrap_or(defaults.environment);
        let log_level = env::var("LOG_LEVEL").unwrap_or(defaults.log_level);
        let jwt_secret = env::var("JWT_SECRET").unwrap_or(defaults.jwt_secret);
        let jwt_expires_in_hours = env::var("JWT_EXPIRES_IN_HOURS")
            .unwrap_or_else(|_| "24".to_string())
            .parse()
            .unwrap_or(defaults.jwt_expires_in_hours);
        let bcrypt_cost = env::var("BCRYPT_COST")
            .ok()
            .and_then(|cost| cost.parse().ok())
            .unwrap_or(defaults.bcrypt_cost);

        let config = AppConfig {
            host,
            port,
            environment,
            log_level,
            jwt_secret,
            jwt_expires_in_hours,
            bcrypt_cost,
        };
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.is_production() && self.jwt_secret == DEFAULT_JWT_SECRET {
            bail!("JWT_SECRET must be set in production");
        }
        if !(1..=MAX_JWT_EXPIRES_IN_HOURS).contains(&self.jwt_expires_in_hours) {
            bail!(
                "JWT_EXPIRES_IN_HOURS must be between 1 and {}",
                MAX_JWT_EXPIRES_IN_HOURS
            );
        }
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.bcrypt_cost) {
            bail!(
                "BCRYPT_COST must be between {} and {}",
                MIN_BCRYPT_COST,
                MAX_BCRYPT_COST
            );
        }
        Ok(())
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig {
            jwt_secret: self.jwt_secret.clone(),
            token_ttl: Duration::hours(self.jwt_expires_in_hours),
            bcrypt_cost: self.bcrypt_cost,
        }
    }
}
