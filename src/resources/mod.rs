//! Resource façades over the transport.
//!
//! Every operation takes [`CallOptions`](crate::validation::CallOptions) and
//! follows one contract: `Ok(None)` / `Ok(false)` when the call failed or was
//! rejected in warn mode, `Err` only in strict mode or when the transport
//! raises.

mod batch;
pub mod paging;
pub mod playlist_tracks;
pub mod playlists;
pub mod tag_categories;
pub mod tags;
pub mod tracks;

pub use paging::{PageCursor, PageStep};
pub use playlist_tracks::PlaylistTracks;
pub use playlists::{PlaylistChanges, Playlists};
pub use tag_categories::{CategoryChanges, TagCategories};
pub use tags::{TagChanges, Tags};
pub use tracks::{TrackQuery, Tracks};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// `data.<key>` of a response envelope.
pub(crate) fn data_field<'v>(response: &'v Value, key: &str) -> Option<&'v Value> {
    response.get("data")?.get(key)
}

/// Decodes a response fragment, logging instead of failing.
pub(crate) fn decode<T: DeserializeOwned>(value: &Value, what: &str) -> Option<T> {
    match serde_json::from_value(value.clone()) {
        Ok(decoded) => Some(decoded),
        Err(err) => {
            warn!("Malformed {what} in response: {err}");
            None
        }
    }
}

/// Decodes each element on its own. Elements that do not decode are logged
/// and skipped so one odd entry cannot sink a whole listing.
pub(crate) fn decode_each<T: DeserializeOwned>(items: &[Value], what: &str) -> Vec<T> {
    items
        .iter()
        .filter_map(|item| match serde_json::from_value(item.clone()) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                match item.get("id") {
                    Some(id) => warn!("Skipping malformed {what} {id}: {err}"),
                    None => warn!("Skipping malformed {what}: {err}"),
                }
                None
            }
        })
        .collect()
}

/// Create/update responses come back either wrapped in `data` or as the bare
/// object; the server does not follow its own documentation here.
pub(crate) fn created_entity(response: &Value) -> Option<&Value> {
    match response.get("data") {
        Some(data @ Value::Object(_)) => Some(data),
        _ if response.get("id").is_some() => Some(response),
        _ => None,
    }
}

/// Raw id list for off mode: a bare id becomes a one-element list.
pub(crate) fn raw_id_list(ids: &Value) -> Value {
    match ids {
        Value::Array(_) => ids.clone(),
        other => Value::Array(vec![other.clone()]),
    }
}
