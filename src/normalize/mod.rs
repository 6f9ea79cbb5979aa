//! Turns loosely-typed caller input into the wire shapes the Lexicon API
//! accepts. Nothing in here logs or looks at the validation mode.

pub mod color;
pub mod composite;
pub mod cues;
pub mod fields;
pub mod playlist;
pub mod values;

pub use color::{Color, normalize_color};
pub use composite::{
    FieldSelection, Outcome, SortEntry, normalize_edits, normalize_fields, normalize_filters,
    normalize_sorts,
};
pub use cues::{
    CuePointUpdate, NestedErrors, NestedIssue, Severity, TempoMarkerUpdate,
    normalize_cuepoint_type, normalize_cuepoints, normalize_tempomarkers,
};
pub use fields::{FieldContext, FieldKind, SortDirection, TrackSource, field_kind};
pub use playlist::{
    PlaylistType, normalize_playlist_path, normalize_playlist_type, normalize_smartlist,
};
pub use values::{
    NONE_SENTINEL, normalize_bool, normalize_date, normalize_id_sequence, normalize_kind,
    normalize_number, normalize_tag_filter, normalize_tag_ids, normalize_text,
};
