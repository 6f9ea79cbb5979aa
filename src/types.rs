use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tabled::Tabled;

/// Accepts `"2"` as well as `2` for the server's type codes.
fn code_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Accepts `3`, `3.0` and `"3"`. Fractional or non-numeric values decode as
/// absent instead of failing the whole entity.
fn whole_number<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Accepts `true`/`false` as well as `1`/`0`.
fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Bool(b)) => Some(b),
        Some(Value::Number(n)) => n.as_i64().map(|v| v != 0),
        _ => None,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CuePoint {
    pub id: Option<i64>,
    pub name: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "code_string")]
    pub kind: Option<String>,
    pub start_time: f64,
    pub end_time: Option<f64>,
    #[serde(default, deserialize_with = "flag")]
    pub active_loop: Option<bool>,
    pub position: i64,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TempoMarker {
    pub id: Option<i64>,
    pub track_id: Option<i64>,
    pub start_time: f64,
    pub bpm: f64,
    pub data: Option<Value>,
}

/// A track as returned by the API. Only the requested fields are present, so
/// everything but `id` is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Track {
    pub id: i64,
    #[serde(rename = "type", deserialize_with = "code_string")]
    pub kind: Option<String>,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album_title: Option<String>,
    pub label: Option<String>,
    pub remixer: Option<String>,
    pub mix: Option<String>,
    pub composer: Option<String>,
    pub producer: Option<String>,
    pub grouping: Option<String>,
    pub lyricist: Option<String>,
    pub comment: Option<String>,
    pub key: Option<String>,
    pub genre: Option<String>,
    pub bpm: Option<f64>,
    #[serde(deserialize_with = "whole_number")]
    pub rating: Option<i64>,
    pub color: Option<String>,
    #[serde(deserialize_with = "whole_number")]
    pub year: Option<i64>,
    pub duration: Option<f64>,
    #[serde(deserialize_with = "whole_number")]
    pub bitrate: Option<i64>,
    #[serde(deserialize_with = "whole_number")]
    pub play_count: Option<i64>,
    pub location: Option<String>,
    pub last_played: Option<String>,
    pub date_added: Option<String>,
    pub date_modified: Option<String>,
    #[serde(deserialize_with = "whole_number")]
    pub size_bytes: Option<i64>,
    #[serde(deserialize_with = "whole_number")]
    pub sample_rate: Option<i64>,
    #[serde(deserialize_with = "whole_number")]
    pub track_number: Option<i64>,
    pub energy: Option<f64>,
    pub danceability: Option<f64>,
    pub popularity: Option<f64>,
    pub happiness: Option<f64>,
    pub extra1: Option<String>,
    pub extra2: Option<String>,
    pub tags: Option<Vec<i64>>,
    pub import_source: Option<Value>,
    pub location_unique: Option<String>,
    pub tempomarkers: Option<Vec<TempoMarker>>,
    pub cuepoints: Option<Vec<CuePoint>>,
    #[serde(deserialize_with = "flag")]
    pub incoming: Option<bool>,
    #[serde(deserialize_with = "flag")]
    pub archived: Option<bool>,
    pub archived_since: Option<String>,
    pub beatshift_case: Option<Value>,
    pub fingerprint: Option<String>,
    pub streaming_service: Option<Value>,
    pub streaming_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Playlist {
    pub id: i64,
    pub name: String,
    pub date_added: Option<String>,
    #[serde(rename = "type", deserialize_with = "code_string")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "code_string")]
    pub folder_type: Option<String>,
    pub parent_id: Option<i64>,
    pub position: Option<i64>,
    pub track_ids: Option<Vec<i64>>,
    pub smartlist: Option<Value>,
    /// Children, populated only in the `/playlists` tree.
    pub playlists: Vec<Playlist>,
}

impl Playlist {
    pub fn is_folder(&self) -> bool {
        self.kind.as_deref() == Some("1")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tag {
    pub id: i64,
    pub label: String,
    pub category_id: Option<i64>,
    pub position: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TagCategory {
    pub id: i64,
    pub label: String,
    pub position: Option<i64>,
    pub color: Option<String>,
    pub tags: Vec<i64>,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    pub id: i64,
    pub artist: String,
    pub title: String,
    pub bpm: String,
    pub key: String,
    pub year: String,
}

impl From<&Track> for TrackTableRow {
    fn from(track: &Track) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        TrackTableRow {
            id: track.id,
            artist: text(&track.artist),
            title: text(&track.title),
            bpm: track.bpm.map(|bpm| format!("{bpm:.1}")).unwrap_or_default(),
            key: text(&track.key),
            year: track.year.map(|y| y.to_string()).unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
pub struct TagTableRow {
    pub id: i64,
    pub category: String,
    pub label: String,
}

#[derive(Tabled)]
pub struct CategoryTableRow {
    pub id: i64,
    pub label: String,
    pub color: String,
    pub tags: usize,
}

impl From<&TagCategory> for CategoryTableRow {
    fn from(category: &TagCategory) -> Self {
        CategoryTableRow {
            id: category.id,
            label: category.label.clone(),
            color: category.color.clone().unwrap_or_default(),
            tags: category.tags.len(),
        }
    }
}
