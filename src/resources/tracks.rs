use serde_json::{Map, Value, json};
use tracing::warn;

use crate::{
    client::Lexicon,
    error::{LexiconError, Result},
    normalize::{
        SortEntry, TrackSource, normalize_edits, normalize_fields, normalize_filters,
        normalize_id_sequence, normalize_sorts,
    },
    resources::{data_field, decode, decode_each, paging::fetch_pages, raw_id_list},
    transport::{Request, Transport},
    types::Track,
    validation::{CallOptions, ValidationMode, Verdict},
};

/// Arguments shared by [`Tracks::list`] and [`Tracks::search`].
///
/// `fields` and `sort` stay loosely typed so that off mode can forward them
/// verbatim. `fields` accepts a list of names or `"all"`/`"*"`; `sort`
/// accepts `[{"field", "dir"}]` objects or `[field, dir]` pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackQuery {
    /// Stop after this many tracks. Only honoured by `list`.
    pub limit: Option<usize>,
    pub offset: usize,
    /// Defaults to `non-archived`.
    pub source: Option<String>,
    pub fields: Option<Value>,
    pub sort: Option<Value>,
}

impl TrackQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn fields(mut self, fields: Value) -> Self {
        self.fields = Some(fields);
        self
    }

    pub fn field_names(self, names: &[&str]) -> Self {
        self.fields(Value::from(names.to_vec()))
    }

    pub fn all_fields(self) -> Self {
        self.fields(Value::from("all"))
    }

    pub fn sort(mut self, sort: Value) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn sort_by(self, entries: &[SortEntry]) -> Self {
        self.sort(Value::Array(entries.iter().map(SortEntry::to_value).collect()))
    }
}

/// Track operations.
pub struct Tracks<'a, T: Transport> {
    pub(crate) client: &'a Lexicon<T>,
}

impl<'a, T: Transport> Tracks<'a, T> {
    pub(crate) fn new(client: &'a Lexicon<T>) -> Self {
        Self { client }
    }

    /// Fetches one track.
    ///
    /// Ids below 1 are rejected per the validation mode; in off mode they are
    /// sent anyway.
    ///
    /// # Arguments
    ///
    /// * `track_id` - Lexicon id of the track
    /// * `opts` - Validation mode and timeout for this call
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Track))` - The decoded track
    /// - `Ok(None)` - Invalid id in warn mode, transport failure, or no track in
    ///   the response
    ///
    /// # Errors
    ///
    /// [`LexiconError::Validation`](crate::LexiconError) for an invalid id in
    /// strict mode; [`LexiconError::Http`](crate::LexiconError) when the transport
    /// raises.
    ///
    /// # Example
    ///
    /// ```
    /// let track = lexicon.tracks().get(42, CallOptions::default()).await?;
    /// ```
    pub async fn get(&self, track_id: i64, opts: CallOptions) -> Result<Option<Track>> {
        if track_id < 1
            && opts
                .validation
                .reject(format!("Invalid track_id for get: {track_id}"))?
                == Verdict::Abort
        {
            return Ok(None);
        }

        let request = Request::get("/track")
            .param("id", track_id)
            .timeout(opts.timeout);
        let Some(response) = self.client.request(request).await? else {
            return Ok(None);
        };
        match data_field(&response, "track").filter(|t| t.is_object()) {
            Some(track) => Ok(decode(track, "track")),
            None => {
                warn!("Track {track_id} not found in response");
                Ok(None)
            }
        }
    }

    /// Fetches many tracks, in input order, with `None` for ids that were not
    /// found.
    ///
    /// Small requests fetch each track; requests covering a noticeable share
    /// of the library list everything once and pick the ids out locally. The
    /// threshold is [`Settings::batch_cutoff_ratio`](crate::client::Settings).
    ///
    /// # Arguments
    ///
    /// * `ids` - A single id or a list. Outside off mode it is reduced to the
    ///   distinct ids `>= 1`; in off mode it is used as given and entries that
    ///   are not integers resolve to `None`.
    /// * `opts` - Validation mode and timeout for this call
    ///
    /// # Returns
    ///
    /// - `Ok(Some(tracks))` - One slot per requested id
    /// - `Ok(None)` - No usable ids in warn mode, or the full listing failed
    ///
    /// # Errors
    ///
    /// Strict mode rejects an id list with no valid ids.
    pub async fn get_many(
        &self,
        ids: impl Into<Value>,
        opts: CallOptions,
    ) -> Result<Option<Vec<Option<Track>>>> {
        let ids: Value = ids.into();
        let requested: Vec<Option<i64>> = if opts.validation.is_off() {
            match raw_id_list(&ids) {
                Value::Array(items) => items.iter().map(Value::as_i64).collect(),
                _ => Vec::new(),
            }
        } else {
            match normalize_id_sequence(&ids) {
                Some(valid) => valid.into_iter().map(Some).collect(),
                None => {
                    opts.validation
                        .reject(format!("Invalid track_ids for get_many: {ids}"))?;
                    return Ok(None);
                }
            }
        };
        self.resolve_batch(&requested, opts).await
    }

    /// Lists tracks page by page until the library or `query.limit` is
    /// exhausted.
    ///
    /// Sort fields are always added to the returned fields so the ordering is
    /// visible in the result. Tracks the server sends in a shape that does not
    /// decode are logged and left out.
    ///
    /// # Arguments
    ///
    /// * `query` - Fields, sort, source and paging window
    /// * `opts` - Validation mode and timeout for this call
    ///
    /// # Returns
    ///
    /// - `Ok(Some(tracks))` - Every track of the requested window
    /// - `Ok(None)` - A page failed or came back without a track list; tracks
    ///   from earlier pages are discarded
    ///
    /// # Errors
    ///
    /// Strict mode raises on an invalid sort, source or field selection.
    ///
    /// # Example
    ///
    /// ```
    /// let query = TrackQuery::new().limit(100).field_names(&["title", "bpm"]);
    /// let tracks = lexicon.tracks().list(&query, CallOptions::default()).await?;
    /// ```
    pub async fn list(&self, query: &TrackQuery, opts: CallOptions) -> Result<Option<Vec<Track>>> {
        let payload = self.listing_payload(query, Vec::new(), opts)?;
        let Some(items) =
            fetch_pages(self.client, "/tracks", &payload, query.limit, query.offset, opts).await?
        else {
            return Ok(None);
        };
        Ok(Some(decode_each(&items, "track")))
    }

    /// Searches with a `field -> value` filter in a single request.
    ///
    /// The server caps search results; a warning is logged when it reports
    /// more matches than it returned.
    ///
    /// # Arguments
    ///
    /// * `filter` - Object of filter field to value, e.g. `bpm: "120-128"`
    /// * `query` - Fields, sort and source; `limit`/`offset` are not used
    /// * `opts` - Validation mode and timeout for this call
    ///
    /// # Returns
    ///
    /// - `Ok(Some(tracks))` - Matching tracks
    /// - `Ok(None)` - The filter is not an object (warn mode) or the request
    ///   failed
    ///
    /// # Errors
    ///
    /// Strict mode raises on a non-object filter and on any invalid filter field
    /// or value.
    ///
    /// # Example
    ///
    /// ```
    /// let filter = json!({"artist": "Daft Punk", "bpm": "120-128"});
    /// let tracks = lexicon.tracks().search(&filter, &TrackQuery::new(), opts).await?;
    /// ```
    pub async fn search(
        &self,
        filter: &Value,
        query: &TrackQuery,
        opts: CallOptions,
    ) -> Result<Option<Vec<Track>>> {
        let mode = opts.validation;
        let (filter_payload, filter_fields) = if mode.is_off() {
            (filter.clone(), Vec::new())
        } else {
            let outcome = match normalize_filters(filter) {
                Ok(outcome) => outcome,
                Err(err) if mode == ValidationMode::Strict => return Err(err.into()),
                Err(err) => {
                    warn!("Skipping search: {err}");
                    return Ok(None);
                }
            };
            mode.report("Invalid filter fields", &outcome.invalid_fields)?;
            mode.report("Invalid filter values", &outcome.value_errors)?;
            let fields: Vec<String> = outcome.accepted.keys().cloned().collect();
            (Value::Object(outcome.accepted), fields)
        };

        let mut payload = self.listing_payload(query, filter_fields, opts)?;
        payload.insert("filter".into(), filter_payload);

        let request = Request::get("/search/tracks")
            .json(Value::Object(payload))
            .timeout(opts.timeout);
        let Some(response) = self.client.request(request).await? else {
            return Ok(None);
        };
        let Some(Value::Array(tracks)) = data_field(&response, "tracks") else {
            warn!("Tracks search response missing expected list; response was {response}");
            return Ok(None);
        };
        if let Some(total) = data_field(&response, "total").and_then(Value::as_i64) {
            if total > tracks.len() as i64 {
                warn!(
                    "Search matched {total} total tracks but is limited to returning {}; \
                     refine your filter.",
                    tracks.len()
                );
            }
        }
        Ok(Some(decode_each(tracks, "track")))
    }

    /// Imports files into the library by location.
    ///
    /// Lexicon may analyse or re-encode new files afterwards, so the returned
    /// tracks can be stale until `dateModified` changes.
    ///
    /// # Arguments
    ///
    /// * `locations` - Absolute file paths; must be non-empty strings
    /// * `opts` - Validation mode and timeout for this call
    ///
    /// # Returns
    ///
    /// - `Ok(Some(tracks))` - The created tracks
    /// - `Ok(None)` - Invalid locations in warn mode or a failed request
    pub async fn add<S: AsRef<str>>(
        &self,
        locations: &[S],
        opts: CallOptions,
    ) -> Result<Option<Vec<Track>>> {
        let locations: Vec<&str> = locations.iter().map(AsRef::as_ref).collect();
        if (locations.is_empty() || locations.iter().any(|l| l.is_empty()))
            && opts
                .validation
                .reject(format!("Invalid locations payload for add: {locations:?}"))?
                == Verdict::Abort
        {
            return Ok(None);
        }

        let request = Request::post("/tracks")
            .json(json!({ "locations": locations }))
            .timeout(opts.timeout);
        let Some(response) = self.client.request(request).await? else {
            return Ok(None);
        };
        match data_field(&response, "tracks") {
            Some(Value::Array(list)) => Ok(Some(decode_each(list, "track"))),
            Some(single @ Value::Object(_)) => {
                Ok(decode::<Track>(single, "track").map(|track| vec![track]))
            }
            _ => {
                warn!("Add tracks response missing expected track list.");
                Ok(None)
            }
        }
    }

    /// Applies edits to one track.
    ///
    /// Numeric fields accept `"+1"`/`"-1"` strings for relative changes;
    /// `tags` replaces the tag set; `cuepoints` and `tempomarkers` replace the
    /// whole list and keep whichever entries are usable.
    ///
    /// # Arguments
    ///
    /// * `track_id` - Lexicon id of the track
    /// * `edits` - Object of edit field to new value
    /// * `opts` - Validation mode and timeout for this call
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Track))` - The track as stored after the edit
    /// - `Ok(None)` - Nothing valid to send, or the request failed
    ///
    /// # Errors
    ///
    /// Strict mode raises on an invalid id, a non-object or empty edit set, and
    /// on any invalid field or value, including partially usable cue points.
    pub async fn update(
        &self,
        track_id: i64,
        edits: &Value,
        opts: CallOptions,
    ) -> Result<Option<Track>> {
        let mode = opts.validation;
        if track_id < 1
            && mode.reject(format!("Invalid track_id for update: {track_id}"))? == Verdict::Abort
        {
            return Ok(None);
        }

        let valid_edits = if mode.is_off() {
            edits.clone()
        } else {
            if edits.as_object().is_none_or(Map::is_empty) {
                mode.reject(format!("Invalid edits payload for track {track_id}: {edits}"))?;
                return Ok(None);
            }
            let outcome = match normalize_edits(edits) {
                Ok(outcome) => outcome,
                Err(err) if mode == ValidationMode::Strict => return Err(err.into()),
                Err(err) => {
                    warn!("Invalid updates: {err}");
                    return Ok(None);
                }
            };
            mode.report("Invalid edit fields", &outcome.invalid_fields)?;
            mode.report("Invalid edit values", &outcome.value_errors)?;
            if outcome.accepted.is_empty() {
                mode.reject(format!("No valid track edit fields provided for {track_id}"))?;
                return Ok(None);
            }
            Value::Object(outcome.accepted)
        };

        let request = Request::patch("/track")
            .json(json!({ "id": track_id, "edits": valid_edits }))
            .timeout(opts.timeout);
        let Some(response) = self.client.request(request).await? else {
            return Ok(None);
        };
        match data_field(&response, "track").filter(|t| t.is_object()) {
            Some(track) => Ok(decode(track, "track")),
            None => {
                warn!("Update track response missing expected track data.");
                Ok(None)
            }
        }
    }

    /// Removes tracks from the library.
    ///
    /// # Arguments
    ///
    /// * `ids` - A single id or a list; duplicates are sent once
    ///
    /// # Returns
    ///
    /// `true` when the server answered.
    pub async fn delete(&self, ids: impl Into<Value>, opts: CallOptions) -> Result<bool> {
        let ids: Value = ids.into();
        let payload = if opts.validation.is_off() {
            json!({ "ids": ids })
        } else {
            match normalize_id_sequence(&ids) {
                Some(valid) => json!({ "ids": valid }),
                None => {
                    opts.validation
                        .reject(format!("Invalid track_ids for delete: {ids}"))?;
                    return Ok(false);
                }
            }
        };
        let request = Request::delete("/tracks")
            .json(payload)
            .timeout(opts.timeout);
        Ok(self.client.request(request).await?.is_some())
    }

    /// `source`, `sort` and `fields` of a list or search payload.
    /// `filter_fields` are extra return fields requested by a search filter.
    fn listing_payload(
        &self,
        query: &TrackQuery,
        filter_fields: Vec<String>,
        opts: CallOptions,
    ) -> Result<Map<String, Value>> {
        let mode = opts.validation;
        let mut payload = Map::new();

        let source = query
            .source
            .clone()
            .unwrap_or_else(|| TrackSource::default().to_string());
        if mode.is_off() {
            payload.insert("source".into(), Value::from(source));
        } else {
            match source.parse::<TrackSource>() {
                Ok(source) => {
                    payload.insert("source".into(), Value::from(source.as_str()));
                }
                Err(err) if mode == ValidationMode::Strict => {
                    return Err(LexiconError::Validation(err));
                }
                Err(_) => warn!("Ignoring invalid track source: {source}"),
            }
        }

        if mode.is_off() {
            if let Some(sort) = &query.sort {
                payload.insert("sort".into(), sort.clone());
            }
            if let Some(fields) = &query.fields {
                payload.insert("fields".into(), fields.clone());
            }
            return Ok(payload);
        }

        let mut extra_fields = Vec::new();
        if let Some(sort) = &query.sort {
            match normalize_sorts(sort) {
                Ok(outcome) => {
                    mode.report("Invalid sort fields", &outcome.invalid_fields)?;
                    mode.report("Invalid sort values", &outcome.value_errors)?;
                    if !outcome.accepted.is_empty() {
                        extra_fields.extend(outcome.accepted.iter().map(|e| e.field.clone()));
                        let sort = outcome.accepted.iter().map(SortEntry::to_value).collect();
                        payload.insert("sort".into(), Value::Array(sort));
                    }
                }
                Err(err) if mode == ValidationMode::Strict => return Err(err.into()),
                Err(err) => warn!("Skipping sort: {err}"),
            }
        }
        extra_fields.extend(filter_fields);

        let selection = normalize_fields(query.fields.as_ref(), &extra_fields);
        if let Some(err) = selection.input_error {
            if mode == ValidationMode::Strict {
                return Err(LexiconError::Validation(format!("Fields: {err}")));
            }
            warn!("Using default fields: {err}");
        }
        mode.report("Invalid field names", &selection.invalid_fields)?;
        if let Some(fields) = selection.fields {
            payload.insert("fields".into(), Value::from(fields));
        }
        Ok(payload)
    }
}
