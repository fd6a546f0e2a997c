//! Runtime configuration.
//!
//! The prediction backend address comes from the environment (with .env
//! support on native builds) and falls back to the local development
//! endpoint the service runs on out of the box.

pub const API_URL_ENV: &str = "ORBITGUARD_API_URL";
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

// ISS and a Starlink payload, handy defaults for a first query.
pub const EXAMPLE_NORAD_ID_1: &str = "25544";
pub const EXAMPLE_NORAD_ID_2: &str = "48274";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            api_base_url: base_url_from(std::env::var(API_URL_ENV).ok()),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
        }
    }
}

fn base_url_from(value: Option<String>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => DEFAULT_API_URL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_or_blank_env_falls_back_to_localhost() {
        assert_eq!(base_url_from(None), DEFAULT_API_URL);
        assert_eq!(base_url_from(Some(String::new())), DEFAULT_API_URL);
        assert_eq!(base_url_from(Some("   ".to_string())), DEFAULT_API_URL);
    }

    #[test]
    fn configured_url_wins_and_is_trimmed() {
        assert_eq!(
            base_url_from(Some(" https://predict.example.net ".to_string())),
            "https://predict.example.net"
        );
    }
}
