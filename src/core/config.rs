use chrono::Duration;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::env;

/// Production platform host
pub const DEFAULT_BASE_URL: &str = "https://platform.fundezy.io";

/// Prefix shared by all environment variables read by [`PlatformConfig::from_env`]
pub const ENV_PREFIX: &str = "FTP";

const DEFAULT_TOKEN_VALIDITY_SECS: i64 = 24 * 60 * 60;
const DEFAULT_REFRESH_BUFFER_SECS: i64 = 60;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Longest session lifetime accepted by [`PlatformConfig::validate`]
const MAX_TOKEN_VALIDITY_SECS: i64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct PlatformConfig {
    pub base_url: String,
    pub email: Secret<String>,
    pub password: Secret<String>,
    pub broker_id: String,
    /// How long a session is trusted after login
    pub token_validity: Duration,
    /// Sessions this close to expiry are refreshed before use
    pub refresh_buffer: Duration,
    /// HTTP request timeout in seconds
    pub timeout_seconds: u64,
}

// Custom Serialize implementation - never expose credentials in serialization
impl Serialize for PlatformConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("PlatformConfig", 7)?;
        state.serialize_field("base_url", &self.base_url)?;
        state.serialize_field("email", "[REDACTED]")?;
        state.serialize_field("password", "[REDACTED]")?;
        state.serialize_field("broker_id", &self.broker_id)?;
        state.serialize_field("token_validity_secs", &self.token_validity.num_seconds())?;
        state.serialize_field("refresh_buffer_secs", &self.refresh_buffer.num_seconds())?;
        state.serialize_field("timeout_seconds", &self.timeout_seconds)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for PlatformConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct PlatformConfigHelper {
            base_url: Option<String>,
            email: String,
            password: String,
            broker_id: String,
            token_validity_secs: Option<i64>,
            refresh_buffer_secs: Option<i64>,
            timeout_seconds: Option<u64>,
        }

        let helper = PlatformConfigHelper::deserialize(deserializer)?;
        let token_validity = seconds(
            "token_validity_secs",
            helper
                .token_validity_secs
                .unwrap_or(DEFAULT_TOKEN_VALIDITY_SECS),
        )
        .map_err(<D::Error as serde::de::Error>::custom)?;
        let refresh_buffer = seconds(
            "refresh_buffer_secs",
            helper
                .refresh_buffer_secs
                .unwrap_or(DEFAULT_REFRESH_BUFFER_SECS),
        )
        .map_err(<D::Error as serde::de::Error>::custom)?;

        let config = Self::new(helper.email, helper.password, helper.broker_id)
            .base_url(
                helper
                    .base_url
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            )
            .token_validity(token_validity)
            .refresh_buffer(refresh_buffer)
            .timeout_seconds(helper.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS));
        Ok(config)
    }
}

impl PlatformConfig {
    /// Create a configuration for the production platform
    #[must_use]
    pub fn new(email: String, password: String, broker_id: String) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            email: Secret::new(email),
            password: Secret::new(password),
            broker_id,
            token_validity: Duration::seconds(DEFAULT_TOKEN_VALIDITY_SECS),
            refresh_buffer: Duration::seconds(DEFAULT_REFRESH_BUFFER_SECS),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `FTP_EMAIL`
    /// - `FTP_PASSWORD`
    /// - `FTP_BROKER_ID`
    /// - `FTP_API_BASE_URL` (optional, defaults to the production host)
    /// - `FTP_TOKEN_VALIDITY_SECS` (optional, defaults to 24 hours)
    /// - `FTP_REFRESH_BUFFER_SECS` (optional, defaults to 60)
    /// - `FTP_TIMEOUT_SECS` (optional, defaults to 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let email = required_var("EMAIL")?;
        let password = required_var("PASSWORD")?;
        let broker_id = required_var("BROKER_ID")?;

        let mut config = Self::new(email, password, broker_id);

        if let Some(base_url) = optional_var("API_BASE_URL") {
            config = config.base_url(base_url);
        }
        if let Some(secs) = parsed_var::<i64>("TOKEN_VALIDITY_SECS")? {
            config.token_validity = seconds(&var_name("TOKEN_VALIDITY_SECS"), secs)?;
        }
        if let Some(secs) = parsed_var::<i64>("REFRESH_BUFFER_SECS")? {
            config.refresh_buffer = seconds(&var_name("REFRESH_BUFFER_SECS"), secs)?;
        }
        if let Some(secs) = parsed_var::<u64>("TIMEOUT_SECS")? {
            config.timeout_seconds = secs;
        }

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from .env file and environment variables
    ///
    /// **Security Warning**: Never commit .env files to version control!
    #[cfg(feature = "env-file")]
    pub fn from_env_file() -> Result<Self, ConfigError> {
        Self::from_env_file_with_path(".env")
    }

    /// Create configuration from a specific .env file path
    ///
    /// A missing file is not an error; the process environment is used as is.
    #[cfg(feature = "env-file")]
    pub fn from_env_file_with_path(env_file_path: &str) -> Result<Self, ConfigError> {
        match dotenv::from_path(env_file_path) {
            Ok(()) => {}
            Err(dotenv::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "Failed to load .env file '{}': {}",
                    env_file_path, e
                )));
            }
        }

        Self::from_env()
    }

    /// Check the values that cannot be caught by the type system
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::InvalidConfiguration(format!(
                "base URL must be http(s): {}",
                self.base_url
            )));
        }
        if self.token_validity <= Duration::zero() {
            return Err(ConfigError::InvalidConfiguration(
                "token validity must be positive".to_string(),
            ));
        }
        if self.token_validity.num_seconds() > MAX_TOKEN_VALIDITY_SECS {
            return Err(ConfigError::InvalidConfiguration(format!(
                "token validity cannot exceed {} seconds",
                MAX_TOKEN_VALIDITY_SECS
            )));
        }
        if self.refresh_buffer < Duration::zero() || self.refresh_buffer >= self.token_validity {
            return Err(ConfigError::InvalidConfiguration(
                "refresh buffer must be non-negative and shorter than the token validity"
                    .to_string(),
            ));
        }
        Ok(())
    }

    /// Check if this configuration carries credentials usable for login
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.email.expose_secret().is_empty()
            && !self.password.expose_secret().is_empty()
            && !self.broker_id.is_empty()
    }

    /// Set custom base URL
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set how long a session stays valid after login
    #[must_use]
    pub fn token_validity(mut self, validity: Duration) -> Self {
        self.token_validity = validity;
        self
    }

    /// Set how long before expiry a session is proactively refreshed
    #[must_use]
    pub fn refresh_buffer(mut self, buffer: Duration) -> Self {
        self.refresh_buffer = buffer;
        self
    }

    /// Set the HTTP timeout
    #[must_use]
    pub const fn timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Get email (use carefully - exposes secret)
    pub fn email(&self) -> &str {
        self.email.expose_secret()
    }

    /// Get password (use carefully - exposes secret)
    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }
}

/// Whole seconds as a duration, or an error when chrono cannot represent them
fn seconds(name: &str, secs: i64) -> Result<Duration, ConfigError> {
    Duration::try_seconds(secs).ok_or_else(|| {
        ConfigError::InvalidConfiguration(format!("{} is out of range: {}", name, secs))
    })
}

fn var_name(suffix: &str) -> String {
    format!("{}_{}", ENV_PREFIX, suffix)
}

fn required_var(suffix: &str) -> Result<String, ConfigError> {
    let name = var_name(suffix);
    match env::var(&name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::MissingEnvironmentVariable(name)),
    }
}

fn optional_var(suffix: &str) -> Option<String> {
    env::var(var_name(suffix)).ok().filter(|v| !v.is_empty())
}

fn parsed_var<T: std::str::FromStr>(suffix: &str) -> Result<Option<T>, ConfigError> {
    optional_var(suffix)
        .map(|raw| {
            raw.parse::<T>().map_err(|_| {
                ConfigError::InvalidConfiguration(format!(
                    "{} is not a valid number: {}",
                    var_name(suffix),
                    raw
                ))
            })
        })
        .transpose()
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvironmentVariable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
