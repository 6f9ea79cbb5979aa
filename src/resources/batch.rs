//! Fetching many tracks by id.

use std::collections::HashMap;

use tracing::debug;

use crate::{
    error::Result,
    resources::tracks::{TrackQuery, Tracks},
    transport::Transport,
    types::Track,
    validation::{CallOptions, ValidationMode},
};

impl<T: Transport> Tracks<'_, T> {
    /// Resolves `ids` in input order. `None` entries and misses stay `None`;
    /// duplicate ids are looked up independently.
    pub(crate) async fn resolve_batch(
        &self,
        ids: &[Option<i64>],
        opts: CallOptions,
    ) -> Result<Option<Vec<Option<Track>>>> {
        // Internal listings use known-good arguments and must never be sent raw.
        let listing_opts = opts.with_validation(ValidationMode::Warn);

        let library = self
            .list(&TrackQuery::new().field_names(&["id"]), listing_opts)
            .await?
            .unwrap_or_default();
        if library.is_empty() {
            debug!("Library size unknown, fetching {} tracks one by one", ids.len());
            return self.fetch_each(ids, opts).await.map(Some);
        }

        let cutoff = library.len() as f64 * self.client.settings().batch_cutoff_ratio;
        if ids.len() as f64 >= cutoff {
            debug!(
                requested = ids.len(),
                library = library.len(),
                "Listing the full library for a batch lookup"
            );
            let Some(all_tracks) = self
                .list(&TrackQuery::new().all_fields(), listing_opts)
                .await?
            else {
                return Ok(None);
            };
            let by_id: HashMap<i64, Track> =
                all_tracks.into_iter().map(|track| (track.id, track)).collect();
            let resolved = ids
                .iter()
                .map(|id| id.and_then(|id| by_id.get(&id).cloned()))
                .collect();
            return Ok(Some(resolved));
        }

        self.fetch_each(ids, opts).await.map(Some)
    }

    async fn fetch_each(
        &self,
        ids: &[Option<i64>],
        opts: CallOptions,
    ) -> Result<Vec<Option<Track>>> {
        let mut resolved = Vec::with_capacity(ids.len());
        for id in ids {
            let track = match id {
                Some(id) => self.get(*id, opts).await?,
                None => None,
            };
            resolved.push(track);
        }
        Ok(resolved)
    }
}
