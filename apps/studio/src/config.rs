use anyhow::{Context, Result};

const DEFAULT_SNAPSHOT_MAX_CHARS: usize = 20_000;

/// Application configuration loaded from environment variables.
/// Nothing is required: without an API key the service runs with the assistant disabled.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
    /// Cap on the rendered snapshot handed to the assistant.
    pub snapshot_max_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            anthropic_api_key: None,
            port: 8080,
            rust_log: "info".to_string(),
            snapshot_max_chars: DEFAULT_SNAPSHOT_MAX_CHARS,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            snapshot_max_chars: match optional_env("SNAPSHOT_MAX_CHARS") {
                Some(raw) => raw
                    .parse::<usize>()
                    .context("SNAPSHOT_MAX_CHARS must be a non-negative integer")?,
                None => DEFAULT_SNAPSHOT_MAX_CHARS,
            },
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
