//! The root client. Holds a transport and the paging/batching thresholds and
//! hands out the per-resource façades.

use serde_json::Value;

use crate::{
    config,
    error::Result,
    resources::{PlaylistTracks, Playlists, TagCategories, Tags, Tracks},
    transport::{HttpTransport, Request, Transport},
};

/// Thresholds tied to the server's pagination behaviour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    /// Tracks requested per page by paged listings.
    pub page_size: usize,
    /// Share of the library at or above which a batch lookup switches from
    /// one request per id to one full listing.
    pub batch_cutoff_ratio: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            page_size: config::DEFAULT_PAGE_SIZE,
            batch_cutoff_ratio: config::DEFAULT_BATCH_CUTOFF_RATIO,
        }
    }
}

impl Settings {
    pub fn from_config() -> Self {
        Self {
            page_size: config::page_size(),
            batch_cutoff_ratio: config::batch_cutoff_ratio(),
        }
    }
}

/// Typed client for the Lexicon local API.
///
/// # Example
///
/// ```
/// use lexicon_client::{CallOptions, Lexicon, resources::TrackQuery};
///
/// #[tokio::main]
/// async fn main() -> lexicon_client::Res<()> {
///     let lexicon = Lexicon::from_config()?;
///     let tracks = lexicon
///         .tracks()
///         .list(&TrackQuery::new().limit(50), CallOptions::default())
///         .await?;
///     println!("{} tracks", tracks.map(|t| t.len()).unwrap_or(0));
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Lexicon<T: Transport = HttpTransport> {
    transport: T,
    settings: Settings,
}

impl Lexicon<HttpTransport> {
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self> {
        Ok(Self::with_transport(HttpTransport::new(host, port)?))
    }

    /// Transport and thresholds from the environment.
    pub fn from_config() -> Result<Self> {
        Ok(Self::with_transport(HttpTransport::from_config()?)
            .with_settings(Settings::from_config()))
    }
}

impl<T: Transport> Lexicon<T> {
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            settings: Settings::default(),
        }
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = Settings {
            page_size: settings.page_size.max(1),
            ..settings
        };
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Raw access to any endpoint. Paths are relative to `/v1`.
    pub async fn request(&self, request: Request) -> Result<Option<Value>> {
        self.transport.request(request).await
    }

    pub fn tracks(&self) -> Tracks<'_, T> {
        Tracks::new(self)
    }

    pub fn playlists(&self) -> Playlists<'_, T> {
        Playlists::new(self)
    }

    pub fn playlist_tracks(&self) -> PlaylistTracks<'_, T> {
        PlaylistTracks::new(self)
    }

    pub fn tags(&self) -> Tags<'_, T> {
        Tags::new(self)
    }

    pub fn categories(&self) -> TagCategories<'_, T> {
        TagCategories::new(self)
    }
}
