//! Relay configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `AOP_SITE_URL` - Public URL of the store (source of the `origin` tag)
//!
//! ## Optional
//! - `AOP_WEBHOOK_URL` - Initial webhook URL for the settings store
//! - `AOP_ENABLED` - `yes`/`no` (default: no)
//! - `AOP_HTTP_TIMEOUT_SECS` - Delivery timeout (default: 45)
//! - `AOP_MAX_REDIRECTS` - Redirects followed (default: 5)
//! - `AOP_VERIFY_TLS` - Verify endpoint certificates (default: true)
//! - `AOP_REJECT_HTTP_ERRORS` - Count HTTP >= 400 as failure (default: false)
//! - `AOP_MAX_ATTEMPTS` - Attempts per job, 1 = no retry (default: 1)
//! - `AOP_WORKERS` - Worker tasks consuming the queue (default: 1)

use std::time::Duration;

use thiserror::Error;

use crate::domain::settings::yes_no;
use crate::queue::RetryPolicy;

const DEFAULT_TIMEOUT_SECS: u64 = 45;
const DEFAULT_MAX_REDIRECTS: usize = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// How a received HTTP response is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusPolicy {
    /// Any response is a success; only transport errors fail.
    #[default]
    TransportOnly,
    /// Status >= 400 is a failure.
    RejectHttpErrors,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryConfig {
    pub timeout: Duration,
    pub max_redirects: usize,
    /// Turning this off accepts any certificate. Opt-out only.
    pub verify_tls: bool,
    pub status_policy: StatusPolicy,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            verify_tls: true,
            status_policy: StatusPolicy::TransportOnly,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub site_url: String,
    pub webhook_url: Option<String>,
    pub enabled: bool,
    pub delivery: DeliveryConfig,
    pub max_attempts: u32,
    pub workers: usize,
}

impl RelayConfig {
    /// Load from the process environment.
    ///
    /// # Errors
    ///
    /// Returns error if `AOP_SITE_URL` is missing or a value does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary lookup (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let site_url = lookup("AOP_SITE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("AOP_SITE_URL".to_string()))?;

        let webhook_url = lookup("AOP_WEBHOOK_URL").filter(|v| !v.trim().is_empty());
        let enabled = parse_flag(&lookup, "AOP_ENABLED", false)?;

        let delivery = DeliveryConfig {
            timeout: Duration::from_secs(parse_num(&lookup, "AOP_HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?),
            max_redirects: parse_num(&lookup, "AOP_MAX_REDIRECTS", DEFAULT_MAX_REDIRECTS)?,
            verify_tls: parse_flag(&lookup, "AOP_VERIFY_TLS", true)?,
            status_policy: if parse_flag(&lookup, "AOP_REJECT_HTTP_ERRORS", false)? {
                StatusPolicy::RejectHttpErrors
            } else {
                StatusPolicy::TransportOnly
            },
        };

        let max_attempts: u32 = parse_num(&lookup, "AOP_MAX_ATTEMPTS", 1)?;
        if max_attempts == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "AOP_MAX_ATTEMPTS".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        let workers: usize = parse_num(&lookup, "AOP_WORKERS", 1)?;

        Ok(Self {
            site_url,
            webhook_url,
            enabled,
            delivery,
            max_attempts,
            workers: workers.max(1),
        })
    }

    /// Queue retry policy. One attempt means no retry.
    pub fn retry_policy(&self) -> RetryPolicy {
        if self.max_attempts <= 1 {
            RetryPolicy::none()
        } else {
            RetryPolicy::bounded(self.max_attempts)
        }
    }
}

fn parse_flag<F>(lookup: &F, key: &str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => yes_no::parse(&raw)
            .ok_or_else(|| ConfigError::InvalidEnvVar(key.to_string(), format!("expected yes/no, got {raw:?}"))),
    }
}

fn parse_num<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
    }
}
