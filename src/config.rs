use std::time::Duration;

/// Host used when no explicit host is configured.
pub const DEFAULT_HOST: &str = "cloud.gluonhq.com";

/// Connection settings for a [`CloudLinkClient`](crate::CloudLinkClient).
///
/// The server key authenticates your CloudLink application and is sent as
/// `Authorization: Gluon <server_key>` on every request. It can be found on
/// the Gluon Dashboard under Credentials > Server.
#[derive(Debug, Clone)]
pub struct CloudLinkConfig {
    pub host: String,
    pub server_key: String,
    pub timeout: Option<Duration>,
}

impl CloudLinkConfig {
    /// Configuration against the default CloudLink host.
    pub fn new(server_key: impl Into<String>) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            server_key: server_key.into(),
            timeout: None,
        }
    }

    /// Configuration against a specific host. `host` may carry an explicit
    /// `http://` or `https://` scheme; without one, `https://` is assumed.
    pub fn with_host(host: impl Into<String>, server_key: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            server_key: server_key.into(),
            timeout: None,
        }
    }

    /// Set a request timeout on the underlying HTTP client.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Scheme-qualified base URL, without a trailing slash.
    pub fn root_url(&self) -> String {
        let host = self.host.trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{host}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_host_gets_https_scheme() {
        let config = CloudLinkConfig::new("key");
        assert_eq!(config.root_url(), "https://cloud.gluonhq.com");
    }

    #[test]
    fn explicit_scheme_is_preserved() {
        let config = CloudLinkConfig::with_host("http://localhost:45010", "key");
        assert_eq!(config.root_url(), "http://localhost:45010");

        let config = CloudLinkConfig::with_host("https://cloud.example.com/", "key");
        assert_eq!(config.root_url(), "https://cloud.example.com");
    }

    #[test]
    fn host_starting_with_http_is_not_mistaken_for_a_scheme() {
        let config = CloudLinkConfig::with_host("httpbin.org", "key");
        assert_eq!(config.root_url(), "https://httpbin.org");

        let config = CloudLinkConfig::with_host("https-gateway.example.com", "key");
        assert_eq!(config.root_url(), "https://https-gateway.example.com");
    }

    #[test]
    fn timeout_is_optional() {
        let config = CloudLinkConfig::new("key");
        assert!(config.timeout.is_none());

        let config = config.timeout(Duration::from_secs(5));
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }
}
