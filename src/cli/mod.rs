//! # CLI Module
//!
//! Command implementations for the `lexicon` binary. Each command builds its
//! arguments, calls one [`Lexicon`](crate::Lexicon) façade operation and
//! renders the result with tables or the console macros.
//!
//! ## Command Categories
//!
//! ### Tracks
//!
//! - [`list_tracks`] - Paged listing with fields, sort and source
//! - [`search_tracks`] - Filtered search in a single request
//! - [`show_track`] - One track as JSON
//! - [`add_tracks`] - Import files by location
//! - [`update_track`] - Apply `field=value` edits
//! - [`delete_tracks`] - Remove tracks from the library
//!
//! ### Playlists
//!
//! - [`playlist_tree`] - The folder tree
//! - [`show_playlist`] - One playlist with its path
//! - [`playlist_by_path`] - Look a playlist up by folder path
//! - [`playlist_tracks`] - Tracks of a playlist
//!
//! ### Tags
//!
//! - [`list_tags`], [`add_tag`], [`delete_tags`], [`list_categories`]
//!
//! ## Error Handling
//!
//! A `None`/`false` result is reported with `warning!` since the library has
//! already logged why. An `Err` (strict validation or a raising transport)
//! ends the program through `error!`.
//!
//! ## Usage Patterns
//!
//! ```bash
//! lexicon tracks list --limit 50 --sort bpm:desc
//! lexicon tracks search artist="Daft Punk" bpm=120-128
//! lexicon --validation strict tracks update 42 rating=5 tags=[3,7]
//! lexicon playlists tree
//! lexicon playlists path Sets Warmup
//! ```

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

mod playlists;
mod tags;
mod tracks;

pub use playlists::playlist_by_path;
pub use playlists::playlist_tracks;
pub use playlists::playlist_tree;
pub use playlists::show_playlist;
pub use tags::add_tag;
pub use tags::delete_tags;
pub use tags::list_categories;
pub use tags::list_tags;
pub use tracks::add_tracks;
pub use tracks::delete_tracks;
pub use tracks::list_tracks;
pub use tracks::search_tracks;
pub use tracks::show_track;
pub use tracks::update_track;

/// A steady-ticking spinner for requests that may take a while on large
/// libraries.
fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
