use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub feed: FeedConfig,
    pub session: SessionConfig,
}

/// REST backend connection settings
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the ServiceHub backend, without trailing slash
    pub base_url: String,
    pub request_timeout: Duration,
    pub user_agent: String,
}

/// Live feed settings
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// How often the polling feed re-reads the backend
    pub poll_interval: Duration,
    /// Capacity of the per-subscription event buffer
    pub buffer: usize,
}

/// Identity the client acts as.
///
/// The token is optional here: a missing token surfaces as an auth failure
/// when a screen fetches, not as a startup error.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub token: Option<String>,
    pub customer_email: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            api: ApiConfig::from_env()?,
            feed: FeedConfig::from_env()?,
            session: SessionConfig::from_env()?,
        })
    }
}

impl ApiConfig {
    const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;
    const DEFAULT_USER_AGENT: &'static str = "ServiceHubSync/1.0";

    pub fn from_env() -> Result<Self, String> {
        let base_url = env::var("SERVICEHUB_API_URL")
            .map_err(|_| "SERVICEHUB_API_URL must be set".to_string())?
            .trim_end_matches('/')
            .to_string();

        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(format!(
                "SERVICEHUB_API_URL must be an http(s) URL, got '{}'",
                base_url
            ));
        }

        let request_timeout_secs = env::var("SERVICEHUB_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_REQUEST_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|e| format!("Invalid SERVICEHUB_REQUEST_TIMEOUT_SECS: {}", e))?;

        let user_agent = env::var("SERVICEHUB_USER_AGENT")
            .unwrap_or_else(|_| Self::DEFAULT_USER_AGENT.to_string());

        Ok(Self {
            base_url,
            request_timeout: Duration::from_secs(request_timeout_secs),
            user_agent,
        })
    }
}

impl FeedConfig {
    const DEFAULT_POLL_SECS: u64 = 5;
    const DEFAULT_BUFFER: usize = 64;

    pub fn from_env() -> Result<Self, String> {
        let poll_secs = env::var("SERVICEHUB_FEED_POLL_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_POLL_SECS.to_string())
            .parse::<u64>()
            .map_err(|e| format!("Invalid SERVICEHUB_FEED_POLL_SECS: {}", e))?;

        if poll_secs == 0 {
            return Err("SERVICEHUB_FEED_POLL_SECS must be greater than zero".to_string());
        }

        let buffer = env::var("SERVICEHUB_FEED_BUFFER")
            .unwrap_or_else(|_| Self::DEFAULT_BUFFER.to_string())
            .parse::<usize>()
            .map_err(|_| "SERVICEHUB_FEED_BUFFER must be a valid number".to_string())?
            .max(1);

        Ok(Self {
            poll_interval: Duration::from_secs(poll_secs),
            buffer,
        })
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(Self::DEFAULT_POLL_SECS),
            buffer: Self::DEFAULT_BUFFER,
        }
    }
}

impl SessionConfig {
    pub fn from_env() -> Result<Self, String> {
        let token = env::var("SERVICEHUB_TOKEN")
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        let customer_email = env::var("SERVICEHUB_CUSTOMER_EMAIL")
            .map_err(|_| "SERVICEHUB_CUSTOMER_EMAIL must be set".to_string())?;

        Ok(Self {
            token,
            customer_email,
        })
    }
}
