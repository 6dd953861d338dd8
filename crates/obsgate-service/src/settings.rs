//! Environment-driven settings.
//!
//! Bootstrap-only surface: everything here is read once at process start.
//! A configured store URL selects bound mode; without one the gateway runs
//! unbound and resolves a store per request.

use std::env;
use std::time::Duration;

use anyhow::Context;
use url::Url;

use obsgate_store::resolve::ClientConfig;

use crate::registrar::DEFAULT_SERVICE_NAME;

#[derive(Debug, Clone)]
pub struct Settings {
    /// Fixed store URL (bound mode). Absent means unbound mode.
    pub store_url: Option<Url>,
    /// Allow plain-HTTP store endpoints.
    pub allow_http: bool,
    /// Overall request timeout against the store, in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Connection timeout against the store, in seconds.
    pub connect_timeout_secs: Option<u64>,
    /// Name the service registers under with the durable host.
    pub service_name: String,
    /// Public keys the host uses to verify request identity. Passed through;
    /// the gateway itself never reads them.
    pub identity_keys: Vec<String>,
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn env_secs(name: &str) -> anyhow::Result<Option<u64>> {
    match env::var(name) {
        Ok(raw) => {
            let secs: u64 = raw
                .parse()
                .with_context(|| format!("{name} must be an integer number of seconds"))?;
            Ok(Some(secs))
        }
        Err(_) => Ok(None),
    }
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        // A missing .env file is fine; real environments configure directly.
        dotenvy::dotenv().ok();

        let store_url = match env::var("OBSGATE_STORE_URL") {
            Ok(raw) if !raw.is_empty() => Some(
                Url::parse(&raw).with_context(|| format!("invalid OBSGATE_STORE_URL '{raw}'"))?,
            ),
            _ => None,
        };

        let service_name =
            env::var("OBSGATE_SERVICE_NAME").unwrap_or_else(|_| DEFAULT_SERVICE_NAME.to_string());

        let identity_keys = env::var("OBSGATE_IDENTITY_KEYS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|key| !key.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            store_url,
            allow_http: env_flag("OBSGATE_ALLOW_HTTP"),
            request_timeout_secs: env_secs("OBSGATE_REQUEST_TIMEOUT_SECS")?,
            connect_timeout_secs: env_secs("OBSGATE_CONNECT_TIMEOUT_SECS")?,
            service_name,
            identity_keys,
        })
    }

    /// HTTP client options for store builders, derived from these settings.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            allow_http: self.allow_http,
            timeout: self.request_timeout_secs.map(Duration::from_secs),
            connect_timeout: self.connect_timeout_secs.map(Duration::from_secs),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_url: None,
            allow_http: false,
            request_timeout_secs: None,
            connect_timeout_secs: None,
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            identity_keys: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.store_url.is_none());
        assert_eq!(settings.service_name, "Obstore");
        assert!(!settings.allow_http);
        assert!(settings.client_config().timeout.is_none());
    }

    #[test]
    fn test_client_config_carries_timeouts() {
        let settings = Settings {
            allow_http: true,
            request_timeout_secs: Some(30),
            connect_timeout_secs: Some(5),
            ..Settings::default()
        };
        let client = settings.client_config();
        assert!(client.allow_http);
        assert_eq!(client.timeout, Some(Duration::from_secs(30)));
        assert_eq!(client.connect_timeout, Some(Duration::from_secs(5)));
    }
}
