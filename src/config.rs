use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_ALLOWED_DOMAIN: &str = "sora.chatgpt.com";
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; PromptPull/1.0)";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("PORT must be a port number, got {0:?}")]
    InvalidPort(String),
    #[error("PROMPTPULL_FETCH_TIMEOUT_SECS must be a positive number of seconds, got {0:?}")]
    InvalidTimeout(String),
}

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Substring every accepted URL host must contain.
    pub allowed_domain: String,
    pub fetch_timeout: Duration,
    pub user_agent: String,
    pub insecure_ssl: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            allowed_domain: DEFAULT_ALLOWED_DOMAIN.to_string(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            insecure_ssl: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Config::default();

        if let Some(raw) = get("PORT") {
            config.port = raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?;
        }

        if let Some(domain) = get("PROMPTPULL_ALLOWED_DOMAIN") {
            config.allowed_domain = domain.to_lowercase();
        }

        if let Some(raw) = get("PROMPTPULL_FETCH_TIMEOUT_SECS") {
            let secs: f64 = raw
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
            if !secs.is_finite() || secs <= 0.0 {
                return Err(ConfigError::InvalidTimeout(raw));
            }
            config.fetch_timeout = Duration::from_secs_f64(secs);
        }

        if let Some(agent) = get("PROMPTPULL_USER_AGENT") {
            config.user_agent = agent;
        }

        config.insecure_ssl = get("PROMPTPULL_INSECURE_SSL").as_deref() == Some("1");

        Ok(config)
    }
}
