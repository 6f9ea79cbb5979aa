use serde_json::{Map, Value};
use tracing::warn;

use crate::{
    client::Lexicon,
    error::Result,
    normalize::{PlaylistType, normalize_id_sequence},
    resources::raw_id_list,
    transport::{Request, Transport},
    types::Track,
    validation::{CallOptions, ValidationMode, Verdict},
};

/// Track membership of a playlist.
pub struct PlaylistTracks<'a, T: Transport> {
    client: &'a Lexicon<T>,
}

impl<'a, T: Transport> PlaylistTracks<'a, T> {
    pub(crate) fn new(client: &'a Lexicon<T>) -> Self {
        Self { client }
    }

    fn check_playlist_id(
        &self,
        playlist_id: i64,
        action: &str,
        opts: CallOptions,
    ) -> Result<Verdict> {
        if playlist_id < 1 {
            return opts
                .validation
                .reject(format!("Invalid playlist_id for {action}: {playlist_id}"));
        }
        Ok(Verdict::Proceed)
    }

    /// Outside off mode, the distinct ids `>= 1`; in off mode the input as a list.
    fn track_id_list(&self, ids: &Value, action: &str, opts: CallOptions) -> Result<Option<Value>> {
        if opts.validation.is_off() {
            return Ok(Some(raw_id_list(ids)));
        }
        match normalize_id_sequence(ids) {
            Some(valid) => Ok(Some(Value::from(valid))),
            None => {
                opts.validation
                    .reject(format!("Invalid track_ids for {action}: {ids}"))?;
                Ok(None)
            }
        }
    }

    /// Track ids of a playlist, in playlist order.
    pub async fn list(&self, playlist_id: i64, opts: CallOptions) -> Result<Option<Vec<i64>>> {
        if playlist_id < 1 {
            self.check_playlist_id(playlist_id, "list", opts)?;
            return Ok(None);
        }
        let playlists = self.client.playlists();
        let Some(playlist) = playlists
            .get(playlist_id, opts.with_validation(ValidationMode::Off))
            .await?
        else {
            return Ok(None);
        };
        match playlist.track_ids {
            Some(ids) => Ok(Some(ids)),
            None => {
                warn!("Playlist {playlist_id} missing expected trackIds list");
                Ok(None)
            }
        }
    }

    /// The tracks of a playlist, resolved through a batch lookup.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(tracks))` - One slot per track id, `None` where the track
    ///   could not be fetched
    /// - `Ok(None)` - The playlist could not be fetched
    pub async fn get(
        &self,
        playlist_id: i64,
        opts: CallOptions,
    ) -> Result<Option<Vec<Option<Track>>>> {
        if playlist_id < 1 {
            self.check_playlist_id(playlist_id, "get", opts)?;
            return Ok(None);
        }
        let Some(track_ids) = self.list(playlist_id, opts).await? else {
            return Ok(None);
        };
        if track_ids.is_empty() {
            return Ok(Some(Vec::new()));
        }
        self.client
            .tracks()
            .get_many(track_ids, opts.with_validation(ValidationMode::Off))
            .await
    }

    /// Adds tracks, appended or inserted at `index`.
    ///
    /// # Arguments
    ///
    /// * `playlist_id` - Lexicon id of a regular playlist
    /// * `track_ids` - A single id or a list; duplicates are sent once
    /// * `index` - Zero-based insert position; appended when `None`
    /// * `opts` - Validation mode and timeout for this call
    ///
    /// # Returns
    ///
    /// `true` when the server accepted the change.
    ///
    /// # Errors
    ///
    /// Strict mode raises on an invalid playlist id, track id list or index.
    pub async fn add(
        &self,
        playlist_id: i64,
        track_ids: impl Into<Value>,
        index: Option<i64>,
        opts: CallOptions,
    ) -> Result<bool> {
        if self.check_playlist_id(playlist_id, "add", opts)? == Verdict::Abort {
            return Ok(false);
        }
        let Some(ids) = self.track_id_list(&track_ids.into(), "add", opts)? else {
            return Ok(false);
        };
        if let Some(index) = index.filter(|i| *i < 0) {
            let verdict = opts
                .validation
                .reject(format!("Invalid index for add: {index}"))?;
            if verdict == Verdict::Abort {
                return Ok(false);
            }
        }

        let mut payload = Map::new();
        payload.insert("id".into(), Value::from(playlist_id));
        payload.insert("trackIds".into(), ids);
        if let Some(index) = index {
            payload.insert("index".into(), Value::from(index));
        }
        let request = Request::patch("/playlist-tracks")
            .json(Value::Object(payload))
            .timeout(opts.timeout);
        Ok(self.client.request(request).await?.is_some())
    }

    /// Removes tracks from a playlist. `true` when the server accepted the
    /// change.
    pub async fn remove(
        &self,
        playlist_id: i64,
        track_ids: impl Into<Value>,
        opts: CallOptions,
    ) -> Result<bool> {
        if self.check_playlist_id(playlist_id, "remove", opts)? == Verdict::Abort {
            return Ok(false);
        }
        let Some(ids) = self.track_id_list(&track_ids.into(), "remove", opts)? else {
            return Ok(false);
        };

        let mut payload = Map::new();
        payload.insert("id".into(), Value::from(playlist_id));
        payload.insert("trackIds".into(), ids);
        let request = Request::delete("/playlist-tracks")
            .json(Value::Object(payload))
            .timeout(opts.timeout);
        Ok(self.client.request(request).await?.is_some())
    }

    /// Replaces the tracks of a regular playlist.
    ///
    /// Runs as remove-all then add; a failure in between leaves the playlist
    /// emptied. Folders and smartlists are refused.
    ///
    /// # Arguments
    ///
    /// * `playlist_id` - Lexicon id of a regular playlist
    /// * `track_ids` - The new contents, in order
    /// * `opts` - Validation mode and timeout for this call
    ///
    /// # Returns
    ///
    /// `true` when both the removal and the insert succeeded.
    ///
    /// # Errors
    ///
    /// Strict mode raises on invalid ids and on playlists that are not regular
    /// playlists.
    pub async fn update(
        &self,
        playlist_id: i64,
        track_ids: impl Into<Value>,
        opts: CallOptions,
    ) -> Result<bool> {
        if playlist_id < 1 {
            self.check_playlist_id(playlist_id, "update", opts)?;
            return Ok(false);
        }
        let raw_opts = opts.with_validation(ValidationMode::Off);
        let Some(playlist) = self.client.playlists().get(playlist_id, raw_opts).await? else {
            return Ok(false);
        };
        if let Some(kind) = playlist.kind.as_deref() {
            if kind != PlaylistType::Playlist.code() {
                opts.validation.reject(format!(
                    "Playlist {playlist_id} is not a normal playlist (type=2)"
                ))?;
                return Ok(false);
            }
        }

        let Some(ids) = self.track_id_list(&track_ids.into(), "update", opts)? else {
            return Ok(false);
        };

        let existing = playlist.track_ids.unwrap_or_default();
        if !existing.is_empty() && !self.remove(playlist_id, existing, raw_opts).await? {
            return Ok(false);
        }
        if ids.as_array().is_some_and(Vec::is_empty) {
            return Ok(true);
        }
        self.add(playlist_id, ids, Some(0), raw_opts).await
    }
}
