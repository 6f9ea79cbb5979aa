//! Configuration for the Lexicon client.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory. Every setting has a default that matches
//! a stock Lexicon installation, so an empty environment is a valid
//! configuration.
//!
//! Lookup order:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Built-in defaults

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use crate::validation::ValidationMode;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 48624;
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_PAGE_SIZE: usize = 1000;
pub const DEFAULT_BATCH_CUTOFF_RATIO: f64 = 0.05;

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the directory if needed. A missing `.env` file is not an error;
/// a file that exists but cannot be parsed is.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/lexicon/.env`
/// - macOS: `~/Library/Application Support/lexicon/.env`
/// - Windows: `%LOCALAPPDATA%/lexicon/.env`
///
/// # Example
///
/// ```
/// use lexicon_client::config;
///
/// #[tokio::main]
/// async fn main() {
///     if let Err(e) = config::load_env().await {
///         eprintln!("Configuration error: {}", e);
///     }
/// }
/// ```
pub async fn load_env() -> Result<(), String> {
    let path = env_file_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if !path.exists() {
        return Ok(());
    }
    dotenv::from_path(&path)
        .map(|_| ())
        .map_err(|e| format!("{}: {}", path.display(), e))
}

pub fn env_file_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("lexicon/.env");
    path
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}

/// Host running Lexicon (`LEXICON_HOST`, default `localhost`).
pub fn lexicon_host() -> String {
    env::var("LEXICON_HOST")
        .ok()
        .filter(|host| !host.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_HOST.to_string())
}

/// Port of the local API (`LEXICON_PORT`, default `48624`).
pub fn lexicon_port() -> u16 {
    env_or("LEXICON_PORT", DEFAULT_PORT)
}

/// Per-request timeout in seconds (`LEXICON_TIMEOUT`, default 20).
pub fn default_timeout() -> Duration {
    Duration::from_secs(env_or("LEXICON_TIMEOUT", DEFAULT_TIMEOUT_SECS))
}

/// Validation mode used by the CLI when `--validation` is not given
/// (`LEXICON_VALIDATION`, default `warn`).
pub fn validation_mode() -> ValidationMode {
    env_or("LEXICON_VALIDATION", ValidationMode::default())
}

/// Tracks requested per page by paged listings (`LEXICON_PAGE_SIZE`).
pub fn page_size() -> usize {
    env_or("LEXICON_PAGE_SIZE", DEFAULT_PAGE_SIZE).max(1)
}

/// Fraction of the library past which a batch lookup lists everything
/// instead of fetching each track (`LEXICON_BATCH_CUTOFF`).
pub fn batch_cutoff_ratio() -> f64 {
    let ratio = env_or("LEXICON_BATCH_CUTOFF", DEFAULT_BATCH_CUTOFF_RATIO);
    if ratio.is_finite() && ratio >= 0.0 {
        ratio
    } else {
        DEFAULT_BATCH_CUTOFF_RATIO
    }
}

/// Whether HTTP failures surface as errors instead of `None`
/// (`LEXICON_RAISE_ON_ERROR`, default false).
pub fn raise_on_error() -> bool {
    env::var("LEXICON_RAISE_ON_ERROR")
        .map(|raw| matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}
