//! Cue point and tempo marker lists for track edits.
//!
//! Both normalizers keep whatever entries are usable and report the rest with
//! a [`Severity`]: the whole input can be unusable (`Fatal`), a single entry can
//! be excluded (`Dropped`), or an entry can be kept with one optional sub-field
//! ignored (`Partial`).

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    error::InvalidValue,
    normalize::{color::normalize_color, values::normalize_bool},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Fatal,
    Dropped,
    Partial,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedIssue {
    pub severity: Severity,
    pub message: String,
}

/// Issues collected while normalizing one nested list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NestedErrors {
    issues: Vec<NestedIssue>,
}

impl NestedErrors {
    fn push(&mut self, severity: Severity, message: impl Into<String>) {
        self.issues.push(NestedIssue {
            severity,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn of(&self, severity: Severity) -> impl Iterator<Item = &str> {
        self.issues
            .iter()
            .filter(move |issue| issue.severity == severity)
            .map(|issue| issue.message.as_str())
    }

    pub fn fatal(&self) -> Vec<&str> {
        self.of(Severity::Fatal).collect()
    }

    pub fn dropped(&self) -> Vec<&str> {
        self.of(Severity::Dropped).collect()
    }

    pub fn partial(&self) -> Vec<&str> {
        self.of(Severity::Partial).collect()
    }

    /// All messages, fatal first, then dropped, then partial.
    pub fn messages(&self) -> Vec<String> {
        let mut issues: Vec<&NestedIssue> = self.issues.iter().collect();
        issues.sort_by_key(|issue| issue.severity);
        issues.into_iter().map(|issue| issue.message.clone()).collect()
    }
}

/// Canonical cue point type codes, indexed by `code - 1`.
pub const CUEPOINT_TYPE_NAMES: [&str; 5] = ["normal", "fade-in", "fade-out", "load", "loop"];
const CUEPOINT_TYPE_CODES: [&str; 5] = ["1", "2", "3", "4", "5"];

/// Cue point type as int `1..=5`, code `"1".."5"` or name, to its code.
pub fn normalize_cuepoint_type(value: &Value) -> Result<&'static str, InvalidValue> {
    let index = match value {
        Value::Number(n) => n
            .as_i64()
            .filter(|code| (1..=5).contains(code))
            .map(|code| (code - 1) as usize),
        Value::String(s) => CUEPOINT_TYPE_CODES
            .iter()
            .position(|code| code == s)
            .or_else(|| CUEPOINT_TYPE_NAMES.iter().position(|name| name == s)),
        _ => None,
    };
    index
        .map(|i| CUEPOINT_TYPE_CODES[i])
        .ok_or_else(|| InvalidValue::new(format!("Invalid cuepoint type: {value}")))
}

/// Wire shape of one cue point in an edit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CuePointUpdate {
    pub position: i64,
    pub start_time: f64,
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_loop: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,
    /// `Some(None)` sends an explicit `null` to clear the colour.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TempoMarkerUpdate {
    pub start_time: f64,
    pub bpm: Value,
}

fn missing_keys(entry: &Map<String, Value>, required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|key| !entry.contains_key(**key))
        .map(|key| key.to_string())
        .collect()
}

fn present<'a>(entry: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    entry.get(key).filter(|value| !value.is_null())
}

pub fn normalize_cuepoints(value: &Value) -> (Vec<CuePointUpdate>, NestedErrors) {
    let mut normalized = Vec::new();
    let mut errors = NestedErrors::default();
    let Value::Array(entries) = value else {
        errors.push(
            Severity::Fatal,
            format!("Cuepoints must be a list. Given: [{value}]"),
        );
        return (normalized, errors);
    };

    for entry in entries {
        let Value::Object(cue) = entry else {
            errors.push(Severity::Dropped, format!("Invalid cuepoint entry: {entry}"));
            continue;
        };
        let missing = missing_keys(cue, &["position", "startTime", "type"]);
        if !missing.is_empty() {
            errors.push(
                Severity::Dropped,
                format!("Missing required keys: {}", missing.join(", ")),
            );
            continue;
        }

        let position = &cue["position"];
        let Some(position) = position.as_i64().filter(|_| !position.is_f64()) else {
            errors.push(Severity::Dropped, format!("Positions must be int: {position}"));
            continue;
        };
        let start_time = &cue["startTime"];
        let Some(start_time) = start_time.as_f64().filter(|_| start_time.is_f64()) else {
            errors.push(
                Severity::Dropped,
                format!("startTime must be float: {start_time}"),
            );
            continue;
        };
        let kind = match normalize_cuepoint_type(&cue["type"]) {
            Ok(kind) => kind,
            Err(err) => {
                errors.push(Severity::Dropped, err.0);
                continue;
            }
        };

        let mut update = CuePointUpdate {
            position,
            start_time,
            kind,
            name: None,
            active_loop: None,
            end_time: None,
            color: None,
        };

        match present(cue, "name") {
            Some(Value::String(name)) => update.name = Some(name.clone()),
            Some(other) => {
                errors.push(Severity::Partial, format!("Name must be a string: {other}"))
            }
            None => {}
        }
        if let Some(active_loop) = present(cue, "activeLoop") {
            match normalize_bool(active_loop) {
                Ok(flag) => update.active_loop = flag.as_u64().map(|f| f as u8),
                Err(err) => errors.push(Severity::Partial, err.0),
            }
        }
        match present(cue, "endTime") {
            Some(end) if end.is_f64() => update.end_time = end.as_f64(),
            Some(end) => errors.push(Severity::Partial, format!("endTime must be a float: {end}")),
            None => {}
        }
        if let Some(color) = present(cue, "color") {
            match normalize_color(color) {
                Ok(color) => update.color = Some(color.map(|c| c.name().to_string())),
                Err(err) => errors.push(Severity::Partial, err.0),
            }
        }

        normalized.push(update);
    }
    (normalized, errors)
}

/// Tempo markers keyed by `startTime`; the first marker at a given start time
/// wins and later ones are dropped.
pub fn normalize_tempomarkers(value: &Value) -> (Vec<TempoMarkerUpdate>, NestedErrors) {
    let mut normalized: Vec<TempoMarkerUpdate> = Vec::new();
    let mut errors = NestedErrors::default();
    let Value::Array(entries) = value else {
        errors.push(
            Severity::Fatal,
            format!("Tempomarkers must be a list. Given [{value}]"),
        );
        return (normalized, errors);
    };

    let mut seen_start_times: Vec<f64> = Vec::new();
    for entry in entries {
        let Value::Object(marker) = entry else {
            errors.push(Severity::Dropped, format!("Invalid entry: {entry}"));
            continue;
        };
        let missing = missing_keys(marker, &["startTime", "bpm"]);
        if !missing.is_empty() {
            errors.push(
                Severity::Dropped,
                format!("Missing required keys: {}", missing.join(", ")),
            );
            continue;
        }

        let start_time = &marker["startTime"];
        let Some(start_time) = start_time.as_f64().filter(|_| start_time.is_f64()) else {
            errors.push(
                Severity::Dropped,
                format!("startTime must be float: {start_time}"),
            );
            continue;
        };
        if seen_start_times.contains(&start_time) {
            errors.push(
                Severity::Dropped,
                format!("Duplicate startTime: {start_time}"),
            );
            continue;
        }
        seen_start_times.push(start_time);

        let bpm = &marker["bpm"];
        if !bpm.is_number() {
            errors.push(Severity::Dropped, format!("bpm must be float or int: {bpm}"));
            continue;
        }

        normalized.push(TempoMarkerUpdate {
            start_time,
            bpm: bpm.clone(),
        });
    }
    (normalized, errors)
}
