use serde_json::{Map, Value, json};
use tracing::warn;

use crate::{
    client::Lexicon,
    error::Result,
    normalize::{
        PlaylistType, normalize_id_sequence, normalize_playlist_path, normalize_playlist_type,
        normalize_smartlist,
    },
    resources::{data_field, decode},
    transport::{Request, Transport},
    types::Playlist,
    utils::{get_path_from_tree, unique_in_order},
    validation::{CallOptions, ValidationMode, Verdict},
};

/// Optional changes for [`Playlists::update`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaylistChanges {
    pub name: Option<String>,
    pub parent_id: Option<i64>,
    pub position: Option<i64>,
    pub smartlist: Option<Value>,
}

/// Playlist and folder operations.
pub struct Playlists<'a, T: Transport> {
    client: &'a Lexicon<T>,
}

/// Folders report the concatenated track lists of their children.
fn dedupe_track_ids(mut playlist: Playlist) -> Playlist {
    if let Some(ids) = playlist.track_ids.take() {
        playlist.track_ids = Some(unique_in_order(ids));
    }
    playlist
}

impl<'a, T: Transport> Playlists<'a, T> {
    pub(crate) fn new(client: &'a Lexicon<T>) -> Self {
        Self { client }
    }

    /// Fetches a playlist with its track ids.
    ///
    /// Folders report the tracks of everything below them, so `track_ids` is
    /// de-duplicated in first-seen order.
    ///
    /// # Arguments
    ///
    /// * `playlist_id` - Lexicon id of the playlist or folder
    /// * `opts` - Validation mode and timeout for this call
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Playlist))` - The playlist
    /// - `Ok(None)` - Invalid id in warn mode or a failed request
    pub async fn get(&self, playlist_id: i64, opts: CallOptions) -> Result<Option<Playlist>> {
        if playlist_id < 1
            && opts
                .validation
                .reject(format!("Invalid playlist_id for get: {playlist_id}"))?
                == Verdict::Abort
        {
            return Ok(None);
        }

        let request = Request::get("/playlist")
            .param("id", playlist_id)
            .timeout(opts.timeout);
        let Some(response) = self.client.request(request).await? else {
            return Ok(None);
        };
        match data_field(&response, "playlist").filter(|p| p.is_object()) {
            Some(playlist) => Ok(decode(playlist, "playlist").map(dedupe_track_ids)),
            None => {
                warn!("Playlist {playlist_id} not found in response");
                Ok(None)
            }
        }
    }

    /// Fetches several playlists one by one, in input order.
    ///
    /// Unknown ids keep a `None` slot. Duplicate ids are fetched once.
    pub async fn get_many(
        &self,
        ids: impl Into<Value>,
        opts: CallOptions,
    ) -> Result<Option<Vec<Option<Playlist>>>> {
        let ids: Value = ids.into();
        let requested: Vec<Option<i64>> = if opts.validation.is_off() {
            match &ids {
                Value::Array(items) => items.iter().map(Value::as_i64).collect(),
                other => vec![other.as_i64()],
            }
        } else {
            match normalize_id_sequence(&ids) {
                Some(valid) => valid.into_iter().map(Some).collect(),
                None => {
                    opts.validation
                        .reject(format!("Invalid playlist_ids for get_many: {ids}"))?;
                    return Ok(None);
                }
            }
        };

        let mut playlists = Vec::with_capacity(requested.len());
        for id in requested {
            let playlist = match id {
                Some(id) => self.get(id, opts.with_validation(ValidationMode::Off)).await?,
                None => None,
            };
            playlists.push(playlist);
        }
        Ok(Some(playlists))
    }

    /// The root of the playlist tree. Tree nodes carry no track ids.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(root))` - The synthetic `ROOT` folder with every playlist
    ///   nested under `playlists`
    /// - `Ok(None)` - The request failed
    pub async fn list(&self, opts: CallOptions) -> Result<Option<Playlist>> {
        let request = Request::get("/playlists").timeout(opts.timeout);
        let Some(response) = self.client.request(request).await? else {
            return Ok(None);
        };
        let Some(Value::Array(roots)) = data_field(&response, "playlists") else {
            warn!("Playlists response missing expected list.");
            return Ok(None);
        };
        match roots.first().filter(|root| root.is_object()) {
            Some(root) => Ok(decode(root, "playlist tree")),
            None => {
                warn!("Playlists response missing expected root entry.");
                Ok(None)
            }
        }
    }

    /// Folder names from the root down to the playlist itself.
    ///
    /// Fetches the whole tree and walks it; the synthetic `ROOT` folder is left
    /// off the front.
    ///
    /// # Arguments
    ///
    /// * `playlist_id` - Lexicon id of the playlist or folder
    /// * `opts` - Validation mode and timeout for this call
    ///
    /// # Returns
    ///
    /// - `Ok(Some(path))` - E.g. `["Sets", "Warmup"]`
    /// - `Ok(None)` - Unknown id, invalid id in warn mode, or a failed request
    pub async fn get_path(
        &self,
        playlist_id: i64,
        opts: CallOptions,
    ) -> Result<Option<Vec<String>>> {
        if playlist_id < 1 {
            opts.validation
                .reject(format!("Invalid playlist_id for get_path: {playlist_id}"))?;
            return Ok(None);
        }
        let Some(root) = self.list(opts).await? else {
            return Ok(None);
        };
        let path = get_path_from_tree(&root, playlist_id);
        if path.is_none() && !opts.validation.is_off() {
            warn!("Playlist path not found for ID: {playlist_id}");
        }
        Ok(path)
    }

    /// Creates a playlist, folder or smartlist and returns its id.
    ///
    /// # Arguments
    ///
    /// * `name` - Display name
    /// * `playlist_type` - `1`-`3`, `"1"`-`"3"` or a name such as `"playlist"`
    /// * `parent_id` - Folder to create it in; the root when `None`
    /// * `smartlist` - Rule object, only for smartlists
    /// * `opts` - Validation mode and timeout for this call
    ///
    /// # Returns
    ///
    /// - `Ok(Some(id))` - Id of the new playlist
    /// - `Ok(None)` - Invalid input in warn mode or a failed request
    ///
    /// # Errors
    ///
    /// Strict mode raises on a blank name, an invalid type or parent, or
    /// smartlist rules that are not an object.
    pub async fn add(
        &self,
        name: &str,
        playlist_type: &Value,
        parent_id: Option<i64>,
        smartlist: Option<&Value>,
        opts: CallOptions,
    ) -> Result<Option<i64>> {
        let mode = opts.validation;
        if name.trim().is_empty()
            && mode.reject(format!("Invalid playlist name for add: {name:?}"))? == Verdict::Abort
        {
            return Ok(None);
        }

        let kind = match normalize_playlist_type(playlist_type) {
            Ok(kind) => Value::from(kind.code()),
            Err(err) => match mode.reject(format!("Invalid playlist_type for add: {err}"))? {
                Verdict::Proceed => playlist_type.clone(),
                Verdict::Abort => return Ok(None),
            },
        };

        if let Some(parent) = parent_id {
            if parent < 1
                && mode.reject(format!("Invalid parent_id for add: {parent}"))? == Verdict::Abort
            {
                return Ok(None);
            }
        }

        if let Some(rules) = smartlist {
            if normalize_smartlist(rules).is_none()
                && mode.reject(format!("Invalid smartlist payload for add: {rules}"))?
                    == Verdict::Abort
            {
                return Ok(None);
            }
        }

        let mut payload = Map::new();
        payload.insert("name".into(), Value::from(name));
        payload.insert("type".into(), kind);
        if let Some(parent) = parent_id {
            payload.insert("parentId".into(), Value::from(parent));
        }
        if let Some(rules) = smartlist {
            payload.insert("smartlist".into(), rules.clone());
        }

        let request = Request::post("/playlist")
            .json(Value::Object(payload))
            .timeout(opts.timeout);
        let Some(response) = self.client.request(request).await? else {
            return Ok(None);
        };
        match data_field(&response, "id").and_then(Value::as_i64) {
            Some(id) => Ok(Some(id)),
            None => {
                warn!("Create playlist response missing expected ID.");
                Ok(None)
            }
        }
    }

    /// Renames, moves, reorders or re-rules a playlist.
    ///
    /// An empty change set sends nothing and returns `None` with a warning.
    pub async fn update(
        &self,
        playlist_id: i64,
        changes: &PlaylistChanges,
        opts: CallOptions,
    ) -> Result<Option<Playlist>> {
        let mode = opts.validation;
        let mut problems = Vec::new();
        if playlist_id < 1 {
            problems.push(format!("Invalid playlist_id for update: {playlist_id}"));
        }
        if let Some(name) = &changes.name {
            if name.trim().is_empty() {
                problems.push(format!("Invalid playlist name for update: {name:?}"));
            }
        }
        if let Some(parent) = changes.parent_id.filter(|p| *p < 1) {
            problems.push(format!("Invalid parent_id for update: {parent}"));
        }
        if let Some(position) = changes.position.filter(|p| *p < 0) {
            problems.push(format!("Invalid position for update: {position}"));
        }
        if let Some(rules) = &changes.smartlist {
            if normalize_smartlist(rules).is_none() {
                problems.push(format!("Invalid smartlist payload for update: {rules}"));
            }
        }
        if let Some(problem) = problems.into_iter().next() {
            if mode.reject(problem)? == Verdict::Abort {
                return Ok(None);
            }
        }

        let mut payload = Map::new();
        payload.insert("id".into(), Value::from(playlist_id));
        if let Some(name) = &changes.name {
            payload.insert("name".into(), Value::from(name.as_str()));
        }
        if let Some(parent) = changes.parent_id {
            payload.insert("parentId".into(), Value::from(parent));
        }
        if let Some(position) = changes.position {
            payload.insert("position".into(), Value::from(position));
        }
        if let Some(rules) = &changes.smartlist {
            payload.insert("smartlist".into(), rules.clone());
        }
        if payload.len() == 1 {
            warn!("No updates provided for playlist {playlist_id}");
            return Ok(None);
        }

        let request = Request::patch("/playlist")
            .json(Value::Object(payload))
            .timeout(opts.timeout);
        let Some(response) = self.client.request(request).await? else {
            return Ok(None);
        };
        match data_field(&response, "playlist").filter(|p| p.is_object()) {
            Some(playlist) => Ok(decode(playlist, "playlist").map(dedupe_track_ids)),
            None => {
                warn!("Update playlist response missing expected playlist data.");
                Ok(None)
            }
        }
    }

    /// Deletes one or more playlists. `true` when the server answered.
    pub async fn delete(&self, ids: impl Into<Value>, opts: CallOptions) -> Result<bool> {
        let ids: Value = ids.into();
        let payload = if opts.validation.is_off() {
            json!({ "ids": ids })
        } else {
            match normalize_id_sequence(&ids) {
                Some(valid) => json!({ "ids": valid }),
                None => {
                    opts.validation
                        .reject(format!("Invalid playlist_ids for delete: {ids}"))?;
                    return Ok(false);
                }
            }
        };
        let request = Request::delete("/playlists")
            .json(payload)
            .timeout(opts.timeout);
        Ok(self.client.request(request).await?.is_some())
    }

    /// Looks a playlist up by its folder path, e.g. `["Sets", "Warmup"]`.
    ///
    /// # Arguments
    ///
    /// * `path` - Folder names from the root, each a non-empty string
    /// * `playlist_type` - Type of the final component; names and codes accepted
    /// * `opts` - Validation mode and timeout for this call
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Playlist))` - The matching playlist
    /// - `Ok(None)` - No match, invalid input in warn mode, or a failed request
    pub async fn get_by_path(
        &self,
        path: &Value,
        playlist_type: &Value,
        opts: CallOptions,
    ) -> Result<Option<Playlist>> {
        let mode = opts.validation;
        let Some(components) = normalize_playlist_path(path) else {
            mode.reject(format!("Invalid playlist_path for get_by_path: {path}"))?;
            return Ok(None);
        };

        let kind = match normalize_playlist_type(playlist_type) {
            Ok(kind) => kind.code().to_string(),
            Err(err) => match mode
                .reject(format!("Invalid playlist_type for get_by_path: {err}"))?
            {
                Verdict::Proceed => match playlist_type {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                },
                Verdict::Abort => return Ok(None),
            },
        };

        let mut request = Request::get("/playlist-by-path").timeout(opts.timeout);
        for component in &components {
            request = request.param("path", component);
        }
        request = request.param("type", kind);

        let Some(response) = self.client.request(request).await? else {
            return Ok(None);
        };
        match data_field(&response, "playlist").filter(|p| p.is_object()) {
            Some(playlist) => Ok(decode(playlist, "playlist")),
            None => {
                warn!("Playlist not found for provided path: {components:?}");
                Ok(None)
            }
        }
    }

    /// [`get_by_path`](Self::get_by_path) for a regular playlist.
    pub async fn get_playlist_by_path(
        &self,
        path: &Value,
        opts: CallOptions,
    ) -> Result<Option<Playlist>> {
        self.get_by_path(path, &Value::from(PlaylistType::Playlist.code()), opts)
            .await
    }
}
