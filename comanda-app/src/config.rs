use std::path::PathBuf;

use comanda_client::ClientConfig;

/// Runtime configuration for the terminal.
///
/// All values come from the environment (a `.env` file is honoured):
///
/// | Variable              | Default                  | Meaning                                  |
/// |-----------------------|--------------------------|------------------------------------------|
/// | `COMANDA_BACKEND_URL` | `http://localhost:54321` | Base URL of the hosted backend           |
/// | `COMANDA_ANON_KEY`    | (empty)                  | Publishable API key sent with every call |
/// | `COMANDA_EXPORT_DIR`  | `exports`                | Directory for CSV/HTML exports           |
/// | `COMANDA_LOG_DIR`     | (unset)                  | Directory for daily rolling log files    |
/// | `COMANDA_CUTOFF_HOUR` | `4`                      | Hour at which the business day rolls over|
/// | `COMANDA_TIMEOUT_SECS`| `30`                     | HTTP request timeout in seconds          |
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend_url: String,
    pub anon_key: String,
    pub export_dir: PathBuf,
    pub log_dir: Option<PathBuf>,
    pub cutoff_hour: u32,
    pub timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            backend_url: env_or("COMANDA_BACKEND_URL", "http://localhost:54321"),
            anon_key: env_or("COMANDA_ANON_KEY", ""),
            export_dir: PathBuf::from(env_or("COMANDA_EXPORT_DIR", "exports")),
            log_dir: std::env::var("COMANDA_LOG_DIR").ok().map(PathBuf::from),
            cutoff_hour: env_parse("COMANDA_CUTOFF_HOUR", 4),
            timeout_secs: env_parse("COMANDA_TIMEOUT_SECS", 30),
        }
    }

    /// Environment values with explicit overrides applied on top.
    pub fn with_overrides(
        backend_url: Option<String>,
        anon_key: Option<String>,
        log_dir: Option<PathBuf>,
    ) -> Self {
        let mut config = Self::from_env();
        if let Some(url) = backend_url {
            config.backend_url = url;
        }
        if let Some(key) = anon_key {
            config.anon_key = key;
        }
        if let Some(dir) = log_dir {
            config.log_dir = Some(dir);
        }
        config
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.backend_url.starts_with("http://") && !self.backend_url.starts_with("https://") {
            return Err(format!(
                "COMANDA_BACKEND_URL must start with http:// or https:// (got '{}')",
                self.backend_url
            ));
        }
        if self.anon_key.trim().is_empty() {
            return Err("COMANDA_ANON_KEY is not set".to_string());
        }
        if self.cutoff_hour >= 24 {
            return Err(format!(
                "COMANDA_CUTOFF_HOUR must be between 0 and 23 (got {})",
                self.cutoff_hour
            ));
        }
        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.backend_url.clone(), self.anon_key.clone())
            .with_timeout(self.timeout_secs)
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AppConfig {
        AppConfig {
            backend_url: "https://demo.example.co".to_string(),
            anon_key: "anon-key".to_string(),
            export_dir: PathBuf::from("exports"),
            log_dir: None,
            cutoff_hour: 4,
            timeout_secs: 30,
        }
    }

    #[test]
    fn validate_accepts_a_sane_config() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn validate_rejects_a_non_http_url() {
        let mut config = sample();
        config.backend_url = "ftp://demo.example.co".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_a_missing_key() {
        let mut config = sample();
        config.anon_key = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_an_out_of_range_cutoff() {
        let mut config = sample();
        config.cutoff_hour = 24;
        assert!(config.validate().is_err());
    }

    #[test]
    fn client_config_carries_url_and_key() {
        let client = sample().client_config();
        assert_eq!(client.base_url, "https://demo.example.co");
        assert_eq!(client.anon_key, "anon-key");
    }
}
