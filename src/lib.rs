//! Lexicon DJ Local API Client Library
//!
//! Typed access to the JSON/HTTP API that the Lexicon DJ library manager
//! serves on the local machine. Every operation normalizes its loose input
//! (field names, values, ids, sorts, filters) before anything is sent and
//! honours a per-call [`ValidationMode`].
//!
//! # Modules
//!
//! - `cli` - Command implementations used by the `lexicon` binary
//! - `client` - The [`Lexicon`] root client and its thresholds
//! - `config` - Environment configuration
//! - `error` - Error types
//! - `normalize` - Pure field and value normalizers
//! - `resources` - Track, playlist and tag façades, paging and batch lookups
//! - `transport` - Request description and the HTTP transport
//! - `types` - Decoded API entities and table rows
//! - `utils` - Playlist tree helpers and CLI argument parsers
//! - `validation` - The off / warn / strict policy
//!
//! # Example
//!
//! ```
//! use lexicon_client::{CallOptions, Lexicon, config};
//!
//! #[tokio::main]
//! async fn main() -> lexicon_client::Res<()> {
//!     config::load_env().await?;
//!     let lexicon = Lexicon::from_config()?;
//!     let track = lexicon.tracks().get(1, CallOptions::default()).await?;
//!     println!("{track:?}");
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod normalize;
pub mod resources;
pub mod transport;
pub mod types;
pub mod utils;
pub mod validation;

pub use client::{Lexicon, Settings};
pub use error::LexiconError;
pub use transport::{HttpTransport, Request, Transport};
pub use validation::{CallOptions, ValidationMode};

/// A convenient Result type alias for application code.
///
/// Library operations return [`error::Result`]; this boxed form is what the
/// binary and examples use to mix those errors with configuration and I/O
/// failures.
///
/// # Example
///
/// ```
/// use lexicon_client::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Found {} tracks", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Deleted {} tracks", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program
/// with status 1. Only for failures the command cannot recover from.
///
/// # Example
///
/// ```
/// error!("Cannot reach Lexicon at {}", url);
/// // Program exits here
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// # Example
///
/// ```
/// warning!("Playlist {} has no tracks", id);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
