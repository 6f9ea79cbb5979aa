//! Playlist type codes, folder paths and smartlist payloads.

use std::fmt;

use serde_json::{Map, Value};

use crate::error::InvalidValue;

const PLAYLIST_TYPE_CODES: [&str; 3] = ["1", "2", "3"];
const PLAYLIST_TYPE_NAMES: [&str; 3] = ["folder", "playlist", "smartlist"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaylistType {
    Folder,
    Playlist,
    Smartlist,
}

impl PlaylistType {
    pub fn code(self) -> &'static str {
        PLAYLIST_TYPE_CODES[self.index()]
    }

    pub fn name(self) -> &'static str {
        PLAYLIST_TYPE_NAMES[self.index()]
    }

    fn index(self) -> usize {
        match self {
            PlaylistType::Folder => 0,
            PlaylistType::Playlist => 1,
            PlaylistType::Smartlist => 2,
        }
    }

    fn from_index(index: usize) -> Option<Self> {
        [
            PlaylistType::Folder,
            PlaylistType::Playlist,
            PlaylistType::Smartlist,
        ]
        .get(index)
        .copied()
    }

    pub fn from_code(code: &str) -> Option<Self> {
        PLAYLIST_TYPE_CODES
            .iter()
            .position(|c| *c == code)
            .and_then(Self::from_index)
    }
}

impl fmt::Display for PlaylistType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Int `1..=3`, code `"1".."3"` or name to a [`PlaylistType`].
pub fn normalize_playlist_type(value: &Value) -> Result<PlaylistType, InvalidValue> {
    let index = match value {
        Value::Number(n) => n
            .as_i64()
            .filter(|code| (1..=3).contains(code))
            .map(|code| (code - 1) as usize),
        Value::String(s) => PLAYLIST_TYPE_CODES
            .iter()
            .position(|code| code == s)
            .or_else(|| PLAYLIST_TYPE_NAMES.iter().position(|name| name == s)),
        _ => None,
    };
    index
        .and_then(PlaylistType::from_index)
        .ok_or_else(|| InvalidValue::new(format!("Invalid playlist type: {value}")))
}

/// Folder path components, each stripped. `None` if the input is not a list,
/// is empty, or holds anything but non-blank strings.
pub fn normalize_playlist_path(value: &Value) -> Option<Vec<String>> {
    let Value::Array(parts) = value else {
        return None;
    };
    let components = parts
        .iter()
        .map(|part| {
            part.as_str()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        })
        .collect::<Option<Vec<_>>>()?;
    if components.is_empty() { None } else { Some(components) }
}

/// Smartlist rules must be an object; the server owns the schema.
pub fn normalize_smartlist(value: &Value) -> Option<&Map<String, Value>> {
    value.as_object()
}
