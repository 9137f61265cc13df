use std::{env, time::Duration};

use crate::error::{PlannerError, Result};

/// Environment key holding the generative model credential
pub const API_KEY_ENV: &str = "PALM_API_KEY";
pub const MODEL_ENV: &str = "GEMINI_MODEL";
pub const BASE_URL_ENV: &str = "GEMINI_BASE_URL";
pub const CURRENCY_ENV: &str = "PLANNER_CURRENCY";

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Settings for one planner instance, built once at startup and passed down explicitly.
#[derive(Clone)]
pub struct PlannerConfig {
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
    currency: String,
}

impl std::fmt::Debug for PlannerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlannerConfig")
            .field("api_key", &"***")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("currency", &self.currency)
            .finish()
    }
}

impl PlannerConfig {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(PlannerError::Config(format!(
                "API key not found: {API_KEY_ENV} is empty"
            )));
        }

        Ok(Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            currency: DEFAULT_CURRENCY.to_string(),
        })
    }

    /// Build from the process environment. The credential is mandatory.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var(API_KEY_ENV).map_err(|_| {
            PlannerError::Config(format!(
                "API key not found: set {API_KEY_ENV} in the environment or a .env file, or pass --api-key"
            ))
        })?;

        Ok(Self::new(api_key)?.with_env_overrides())
    }

    /// Apply the optional model, base URL and currency variables when set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(model) = env::var(MODEL_ENV) {
            self = self.with_model(model);
        }
        if let Ok(base_url) = env::var(BASE_URL_ENV) {
            self = self.with_base_url(base_url);
        }
        if let Ok(currency) = env::var(CURRENCY_ENV) {
            self = self.with_currency(currency);
        }
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }
}
