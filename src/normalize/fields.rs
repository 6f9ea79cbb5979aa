//! Static classification of every track attribute.
//!
//! Each attribute maps to at most one [`FieldKind`]; the structured list fields
//! (`cuepoints`, `tempomarkers`) have no generic kind and get bespoke handling.
//! Four allow-lists decide which attributes are valid when filtering, editing,
//! sorting and selecting return fields. Every filter, edit and sort field is
//! also a return field.

use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Bool,
    Text,
    Number,
    Date,
    Tag,
}

/// Where a value is headed. Some normalizers treat `null` differently when
/// building a search filter than when building an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldContext {
    Filter,
    Edit,
}

/// Every attribute the API knows about, in the server's documented order.
pub const TRACK_FIELDS: &[&str] = &[
    "id",
    "type",
    "title",
    "artist",
    "albumTitle",
    "label",
    "remixer",
    "mix",
    "composer",
    "producer",
    "grouping",
    "lyricist",
    "comment",
    "key",
    "genre",
    "bpm",
    "rating",
    "color",
    "year",
    "duration",
    "bitrate",
    "playCount",
    "location",
    "lastPlayed",
    "dateAdded",
    "dateModified",
    "sizeBytes",
    "sampleRate",
    "trackNumber",
    "energy",
    "danceability",
    "popularity",
    "happiness",
    "extra1",
    "extra2",
    "tags",
    "importSource",
    "locationUnique",
    "tempomarkers",
    "cuepoints",
    "incoming",
    "archived",
    "archivedSince",
    "beatshiftCase",
    "fingerprint",
    "streamingService",
    "streamingId",
];

/// Returned by list and search when the caller does not pick fields.
pub const DEFAULT_TRACK_FIELDS: &[&str] = &[
    "id",
    "artist",
    "title",
    "albumTitle",
    "bpm",
    "key",
    "duration",
    "year",
];

pub const FILTER_FIELDS: &[&str] = &[
    "title",
    "artist",
    "albumTitle",
    "label",
    "remixer",
    "mix",
    "composer",
    "producer",
    "grouping",
    "lyricist",
    "comment",
    "key",
    "genre",
    "color",
    "location",
    "importSource",
    "extra1",
    "extra2",
    "bpm",
    "rating",
    "year",
    "duration",
    "bitrate",
    "playCount",
    "sampleRate",
    "trackNumber",
    "energy",
    "danceability",
    "popularity",
    "happiness",
    "lastPlayed",
    "dateAdded",
    "dateModified",
    "tags",
];

pub const EDIT_FIELDS: &[&str] = &[
    "title",
    "artist",
    "albumTitle",
    "label",
    "remixer",
    "mix",
    "composer",
    "producer",
    "grouping",
    "lyricist",
    "comment",
    "key",
    "genre",
    "rating",
    "color",
    "year",
    "playCount",
    "trackNumber",
    "energy",
    "danceability",
    "popularity",
    "happiness",
    "extra1",
    "extra2",
    "tags",
    "tempomarkers",
    "cuepoints",
    "incoming",
    "archived",
];

/// List-valued attributes the server cannot order by.
pub const SORT_DISALLOWED: &[&str] = &["cuepoints", "tempomarkers", "tags"];

pub fn is_track_field(name: &str) -> bool {
    TRACK_FIELDS.contains(&name)
}

pub fn is_filter_field(name: &str) -> bool {
    FILTER_FIELDS.contains(&name)
}

pub fn is_edit_field(name: &str) -> bool {
    EDIT_FIELDS.contains(&name)
}

pub fn is_sort_field(name: &str) -> bool {
    is_track_field(name) && !SORT_DISALLOWED.contains(&name)
}

/// The value kind of a track attribute, or `None` for attributes without a
/// generic normalizer.
pub fn field_kind(name: &str) -> Option<FieldKind> {
    let kind = match name {
        "archived" | "incoming" => FieldKind::Bool,
        "title" | "artist" | "albumTitle" | "label" | "remixer" | "mix" | "composer"
        | "producer" | "grouping" | "lyricist" | "comment" | "key" | "genre" | "color"
        | "location" | "importSource" | "extra1" | "extra2" | "fingerprint"
        | "locationUnique" | "streamingId" => FieldKind::Text,
        "bpm" | "rating" | "year" | "duration" | "bitrate" | "playCount" | "sampleRate"
        | "id" | "trackNumber" | "energy" | "danceability" | "popularity" | "happiness"
        | "beatshiftCase" | "sizeBytes" | "streamingService" | "type" => FieldKind::Number,
        "lastPlayed" | "dateAdded" | "dateModified" | "archivedSince" => FieldKind::Date,
        "tags" => FieldKind::Tag,
        _ => return None,
    };
    Some(kind)
}

/// Which slice of the library a list or search runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackSource {
    #[default]
    NonArchived,
    All,
    Archived,
    Incoming,
}

impl TrackSource {
    pub const ALL: [TrackSource; 4] = [
        TrackSource::NonArchived,
        TrackSource::All,
        TrackSource::Archived,
        TrackSource::Incoming,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TrackSource::NonArchived => "non-archived",
            TrackSource::All => "all",
            TrackSource::Archived => "archived",
            TrackSource::Incoming => "incoming",
        }
    }
}

impl fmt::Display for TrackSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrackSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TrackSource::ALL
            .into_iter()
            .find(|source| source.as_str() == s)
            .ok_or_else(|| format!("Invalid track source: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }
}
