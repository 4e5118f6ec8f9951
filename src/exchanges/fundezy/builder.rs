use crate::core::clock::{Clock, SystemClock};
use crate::core::config::PlatformConfig;
use crate::core::errors::TradingError;
use crate::core::kernel::{ReqwestRest, RestClient, RestClientBuilder, RestClientConfig};
use crate::exchanges::fundezy::client::FundezyClient;
use crate::exchanges::fundezy::connector::FundezyConnector;
use std::sync::Arc;

/// Builder for a [`FundezyConnector`]
pub struct FundezyBuilder {
    config: PlatformConfig,
    clock: Arc<dyn Clock>,
    user_agent: Option<String>,
}

impl FundezyBuilder {
    pub fn new(config: PlatformConfig) -> Self {
        Self {
            config,
            clock: Arc::new(SystemClock),
            user_agent: None,
        }
    }

    /// Use a custom time source for expiry checks
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a connector over the reqwest transport
    pub fn build(self) -> Result<FundezyConnector<ReqwestRest>, TradingError> {
        let mut rest_config = RestClientConfig::default().with_timeout(self.config.timeout_seconds);
        if let Some(user_agent) = self.user_agent.clone() {
            rest_config = rest_config.with_user_agent(user_agent);
        }
        let rest = RestClientBuilder::new(rest_config).build()?;

        self.build_with_rest(rest)
    }

    /// Build a connector over a caller-supplied transport
    pub fn build_with_rest<R: RestClient>(
        self,
        rest: R,
    ) -> Result<FundezyConnector<R>, TradingError> {
        self.config.validate()?;
        if !self.config.has_credentials() {
            return Err(TradingError::ConfigurationError(
                "email, password and broker id are required".to_string(),
            ));
        }

        let client = FundezyClient::with_clock(rest, self.config, self.clock);
        Ok(FundezyConnector::new(client))
    }
}

/// Create a Fundezy connector with default settings
pub fn build_connector(
    config: PlatformConfig,
) -> Result<FundezyConnector<ReqwestRest>, TradingError> {
    FundezyBuilder::new(config).build()
}

/// Create a Fundezy connector from `FTP_*` environment variables
pub fn build_connector_from_env() -> Result<FundezyConnector<ReqwestRest>, TradingError> {
    build_connector(PlatformConfig::from_env()?)
}
