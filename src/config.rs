//! Client Configuration
//!
//! Endpoint, origin and status policy, with `LED_TOGGLE_*` environment overrides.

use std::env;

use crate::error::{LedClientError, LedResult};

pub const DEFAULT_ENDPOINT: &str = "ws://baobao.local/wsled";

pub const ENDPOINT_ENV: &str = "LED_TOGGLE_ENDPOINT";
pub const ORIGIN_ENV: &str = "LED_TOGGLE_ORIGIN";
pub const STRICT_STATUS_ENV: &str = "LED_TOGGLE_STRICT_STATUS";

/// How device-reported `status` values are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusPolicy {
    /// Any value is stored and displayed.
    #[default]
    Permissive,
    /// Only "on" and "off" are stored; other values are logged and dropped.
    Strict,
}

/// Connection settings for the LED client.
#[derive(Debug, Clone)]
pub struct LedClientConfig {
    pub endpoint: String,
    pub origin: Option<String>,
    pub status_policy: StatusPolicy,
}

impl LedClientConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn with_status_policy(mut self, status_policy: StatusPolicy) -> Self {
        self.status_policy = status_policy;
        self
    }

    /// Defaults overridden by `LED_TOGGLE_ENDPOINT`, `LED_TOGGLE_ORIGIN`
    /// and `LED_TOGGLE_STRICT_STATUS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(endpoint) = lookup(ENDPOINT_ENV) {
            config = config.with_endpoint(endpoint);
        }
        if let Some(origin) = lookup(ORIGIN_ENV) {
            config = config.with_origin(origin);
        }
        if let Some(strict) = lookup(STRICT_STATUS_ENV) {
            if matches!(strict.trim(), "1" | "true" | "yes") {
                config = config.with_status_policy(StatusPolicy::Strict);
            }
        }

        config
    }

    /// Check the endpoint and return it parsed.
    ///
    /// Only plain `ws://` is accepted since the transport is built without TLS.
    pub fn validate(&self) -> LedResult<url::Url> {
        let url = url::Url::parse(&self.endpoint)
            .map_err(|e| LedClientError::invalid_endpoint(&self.endpoint, e.to_string()))?;

        if url.scheme() != "ws" {
            return Err(LedClientError::invalid_endpoint(
                &self.endpoint,
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }
        if url.host_str().is_none() {
            return Err(LedClientError::invalid_endpoint(&self.endpoint, "missing host"));
        }

        Ok(url)
    }
}

impl Default for LedClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            origin: None,
            status_policy: StatusPolicy::Permissive,
        }
    }
}
