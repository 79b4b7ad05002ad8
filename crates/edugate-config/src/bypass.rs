//! Deployment environment and platform owner identity.
//!
//! The platform owner bypass is only ever honored when the environment is
//! explicitly [`Environment::Development`]. Anything that is not spelled
//! `development` is treated as a non-development deployment, including a
//! missing `APP_ENV`.

use serde::Serialize;
use std::env;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Parse an `APP_ENV` value. Unknown values map to `Production`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "development" => Environment::Development,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }

    pub fn is_development(self) -> bool {
        self == Environment::Development
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug)]
pub struct BypassConfig {
    pub environment: Environment,
    /// Email that identifies the platform owner in development.
    pub owner_email: Option<String>,
}

impl BypassConfig {
    pub fn new(environment: Environment, owner_email: Option<String>) -> Self {
        let owner_email = owner_email
            .map(|email| email.trim().to_string())
            .filter(|email| !email.is_empty());

        Self {
            environment,
            owner_email,
        }
    }

    pub fn from_env() -> Self {
        let environment = env::var("APP_ENV")
            .map(|v| Environment::parse(&v))
            .unwrap_or(Environment::Production);
        let config = Self::new(environment, env::var("PLATFORM_OWNER_EMAIL").ok());

        if config.environment.is_development() && config.owner_email.is_some() {
            tracing::warn!(
                environment = %config.environment,
                "Platform owner bypass is enabled for this process"
            );
        }

        config
    }

    /// Both the development environment and an owner email are required.
    pub fn is_enabled(&self) -> bool {
        self.environment.is_development() && self.owner_email.is_some()
    }
}
