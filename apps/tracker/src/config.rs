use std::str::FromStr;

use anyhow::{Context, Result};

use crate::models::user::SessionUser;
use crate::models::EntityId;
use crate::policy::Role;
use crate::session::Session;

const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

/// Client configuration loaded from environment variables (and `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    /// Extra attempts for idempotent GETs on 429 / 5xx. Writes are never retried.
    pub fetch_retries: u32,
    pub user_id: Option<String>,
    pub user_name: String,
    pub user_role: Role,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let user_role = require_env("ATS_USER_ROLE")?;

        Ok(Config {
            api_base_url: std::env::var("ATS_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
            request_timeout_secs: parse_env("ATS_REQUEST_TIMEOUT_SECS", 30)?,
            fetch_retries: parse_env("ATS_FETCH_RETRIES", 3)?,
            user_id: std::env::var("ATS_USER_ID").ok(),
            user_name: std::env::var("ATS_USER_NAME").unwrap_or_else(|_| "Unknown".to_string()),
            user_role: user_role
                .parse()
                .with_context(|| format!("ATS_USER_ROLE '{user_role}' is not a known role"))?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn session(&self) -> Session {
        Session::new(SessionUser {
            id: self
                .user_id
                .as_deref()
                .and_then(|id| id.parse::<EntityId>().ok()),
            name: self.user_name.clone(),
            email: None,
            role: self.user_role,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    parse_value(key, std::env::var(key).ok(), default)
}

fn parse_value<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(v) if !v.trim().is_empty() => v
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{v}'")),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_defaults_when_unset_or_blank() {
        assert_eq!(parse_value::<u64>("T", None, 30).unwrap(), 30);
        assert_eq!(parse_value::<u64>("T", Some("  ".into()), 30).unwrap(), 30);
        assert_eq!(parse_value::<u64>("T", Some("5".into()), 30).unwrap(), 5);
    }

    #[test]
    fn test_parse_value_rejects_garbage() {
        let err = parse_value::<u32>("ATS_FETCH_RETRIES", Some("lots".into()), 3).unwrap_err();
        assert!(err.to_string().contains("ATS_FETCH_RETRIES"));
    }

    #[test]
    fn test_session_from_config() {
        let config = Config {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: 30,
            fetch_retries: 3,
            user_id: Some("12".to_string()),
            user_name: "Priya".to_string(),
            user_role: Role::Recruiter,
            rust_log: "info".to_string(),
        };
        let session = config.session();
        assert_eq!(session.role(), Role::Recruiter);
        assert_eq!(session.user().id, Some(EntityId::Number(12)));
    }
}
