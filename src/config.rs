//! Runtime settings.
//!
//! The only configurable piece is the interpretation service's base address,
//! resolved in order: CLI flag, `EPSLAB_API_URL` (with `.env` honored), then
//! the hosted default.

use std::env;

/// Address of the hosted interpretation service.
pub const DEFAULT_BASE_URL: &str = "https://app.eps.rf.gd";

const BASE_URL_ENV: &str = "EPSLAB_API_URL";

#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: String,
}

impl Settings {
    /// Resolve settings from an optional CLI override and the environment.
    pub fn resolve(cli_base_url: Option<String>) -> Self {
        dotenvy::dotenv().ok();
        let base_url = cli_base_url
            .or_else(|| env::var(BASE_URL_ENV).ok())
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Settings {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_override_wins_and_is_trimmed() {
        let settings = Settings::resolve(Some("http://127.0.0.1:9999///".to_string()));
        assert_eq!(settings.base_url, "http://127.0.0.1:9999");
    }

    #[test]
    fn blank_override_falls_through() {
        let settings = Settings::resolve(Some("   ".to_string()));
        assert_ne!(settings.base_url, "");
    }
}
