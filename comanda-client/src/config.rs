//! Client configuration

/// Configuration for connecting to the hosted backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Platform base URL (e.g. "https://project.example.co")
    pub base_url: String,

    /// Anonymous API key, sent as `apikey` on every request and used as the
    /// bearer token until someone signs in
    pub anon_key: String,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            timeout: 30,
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Websocket endpoint of the realtime change feed, derived from the
    /// base URL.
    pub fn realtime_url(&self) -> String {
        let ws_base = if let Some(rest) = self.base_url.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = self.base_url.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            format!("wss://{}", self.base_url)
        };
        format!("{ws_base}/realtime/v1/websocket?apikey={}", self.anon_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let config = ClientConfig::new("https://demo.example.co/", "anon");
        assert_eq!(config.base_url, "https://demo.example.co");
    }

    #[test]
    fn realtime_url_switches_scheme() {
        let config = ClientConfig::new("https://demo.example.co", "anon");
        assert_eq!(
            config.realtime_url(),
            "wss://demo.example.co/realtime/v1/websocket?apikey=anon"
        );

        let local = ClientConfig::new("http://localhost:54321", "anon");
        assert!(local.realtime_url().starts_with("ws://localhost:54321/"));
    }
}
