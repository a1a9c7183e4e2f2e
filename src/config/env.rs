use anyhow::Context;
use std::{env, time::Duration};

const DEFAULT_ASSESSMENT: &str = "assessments/web-fundamentals.yaml";
const DEFAULT_SANDBOX_URL: &str = "https://emkc.org/api/v2/piston/execute";
const DEFAULT_SANDBOX_TIMEOUT_SECS: u64 = 15;

/// Runtime settings, read from the environment (and a `.env` file if present).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// assessment definition to load
    pub assessment_path: String,

    /// code-execution endpoint
    pub sandbox_url: String,

    pub sandbox_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            assessment_path: DEFAULT_ASSESSMENT.to_string(),
            sandbox_url: DEFAULT_SANDBOX_URL.to_string(),
            sandbox_timeout: Duration::from_secs(DEFAULT_SANDBOX_TIMEOUT_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        if let Err(e) = dotenv::dotenv() {
            log::debug!("no .env file loaded: {}", e);
        }
        Self::from_vars(|key| env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let sandbox_timeout = match var("STRIDE_SANDBOX_TIMEOUT_SECS") {
            Some(secs) => Duration::from_secs(secs.parse::<u64>().context(format!(
                "STRIDE_SANDBOX_TIMEOUT_SECS must be a number, got '{}'",
                secs
            ))?),
            None => defaults.sandbox_timeout,
        };

        Ok(Self {
            assessment_path: var("STRIDE_ASSESSMENT").unwrap_or(defaults.assessment_path),
            sandbox_url: var("STRIDE_SANDBOX_URL").unwrap_or(defaults.sandbox_url),
            sandbox_timeout,
        })
    }
}
