use std::{env, fmt, str::FromStr, time::Duration};

use crate::error::{EstimatorError, Result};

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_RETRIES: usize = 2;

/// Remote completion backends the estimator can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AiProvider {
    #[default]
    OpenAI,
    Anthropic,
    Cohere,
    Mistral,
}

impl AiProvider {
    pub const ALL: [AiProvider; 4] = [
        AiProvider::OpenAI,
        AiProvider::Anthropic,
        AiProvider::Cohere,
        AiProvider::Mistral,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AiProvider::OpenAI => "openai",
            AiProvider::Anthropic => "anthropic",
            AiProvider::Cohere => "cohere",
            AiProvider::Mistral => "mistral",
        }
    }

    pub fn default_base_url(self) -> &'static str {
        match self {
            AiProvider::OpenAI => "https://api.openai.com/v1",
            AiProvider::Anthropic => "https://api.anthropic.com/v1",
            AiProvider::Cohere => "https://api.cohere.ai/v1",
            AiProvider::Mistral => "https://api.mistral.ai/v1",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            AiProvider::OpenAI => "gpt-4o-mini",
            AiProvider::Anthropic => "claude-3-sonnet-20240229",
            AiProvider::Cohere => "command",
            AiProvider::Mistral => "mistral-small",
        }
    }
}

impl fmt::Display for AiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AiProvider {
    type Err = EstimatorError;

    fn from_str(value: &str) -> Result<Self> {
        AiProvider::ALL
            .into_iter()
            .find(|provider| provider.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| {
                EstimatorError::Config(format!("Unsupported AI provider: {}", value.trim()))
            })
    }
}

/// Settings for the remote estimation path.
///
/// Without an API key the estimator never leaves the deterministic path.
#[derive(Clone)]
pub struct EstimatorConfig {
    pub provider: AiProvider,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub timeout: Duration,
    pub max_retries: usize,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            provider: AiProvider::default(),
            api_key: None,
            model: None,
            base_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

// Keeps the API key out of logs.
impl fmt::Debug for EstimatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EstimatorConfig")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl EstimatorConfig {
    pub fn new(provider: AiProvider) -> Self {
        Self {
            provider,
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Usable credential, if any. Blank keys count as absent.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .filter(|model| !model.trim().is_empty())
            .unwrap_or_else(|| self.provider.default_model())
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| self.provider.default_base_url())
    }

    /// Read `AI_PROVIDER`, `AI_API_KEY`, `AI_MODEL`, `AI_BASE_URL`,
    /// `AI_TIMEOUT_SECS` and `AI_MAX_RETRIES`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`EstimatorConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup("AI_PROVIDER") {
            Some(provider) if !provider.trim().is_empty() => Self::new(provider.parse()?),
            _ => Self::default(),
        };

        config.api_key = lookup("AI_API_KEY");
        config.model = lookup("AI_MODEL");
        config.base_url = lookup("AI_BASE_URL");

        if let Some(raw) = lookup("AI_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                EstimatorError::Config(format!("AI_TIMEOUT_SECS must be a number, got `{raw}`"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        if let Some(raw) = lookup("AI_MAX_RETRIES") {
            config.max_retries = raw.trim().parse().map_err(|_| {
                EstimatorError::Config(format!("AI_MAX_RETRIES must be a number, got `{raw}`"))
            })?;
        }

        Ok(config)
    }
}
