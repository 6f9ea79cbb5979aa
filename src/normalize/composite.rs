//! Whole-payload normalizers for filters, edits, sorts and field selection.
//!
//! Every composite normalizer walks its input once and lands each entry in
//! exactly one bucket of an [`Outcome`]. The validation mode is applied later,
//! by the caller, so the same function serves list, search and update.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    error::InvalidValue,
    normalize::{
        cues::{NestedErrors, normalize_cuepoints, normalize_tempomarkers},
        fields::{
            DEFAULT_TRACK_FIELDS, FieldContext, FieldKind, SortDirection, field_kind,
            is_edit_field, is_filter_field, is_sort_field, is_track_field,
        },
        values::{normalize_kind, normalize_tag_filter, normalize_tag_ids},
    },
};

/// Accepted payload plus the two rejection buckets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome<T> {
    pub accepted: T,
    pub invalid_fields: Vec<String>,
    pub value_errors: Vec<String>,
}

impl<T> Outcome<T> {
    pub fn is_clean(&self) -> bool {
        self.invalid_fields.is_empty() && self.value_errors.is_empty()
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

pub fn normalize_filters(filters: &Value) -> Result<Outcome<Map<String, Value>>, InvalidValue> {
    let Value::Object(entries) = filters else {
        return Err(InvalidValue::new(format!(
            "Filter input must be a dict: {}",
            describe(filters)
        )));
    };

    let mut outcome = Outcome::<Map<String, Value>>::default();
    for (field, value) in entries {
        if !is_filter_field(field) {
            outcome.invalid_fields.push(field.clone());
            continue;
        }
        let normalized = match field_kind(field) {
            Some(FieldKind::Tag) => normalize_tag_filter(value),
            Some(kind) => normalize_kind(kind, value, FieldContext::Filter),
            None => Ok(value.clone()),
        };
        match normalized {
            Ok(value) => {
                outcome.accepted.insert(field.clone(), value);
            }
            Err(err) => outcome.value_errors.push(format!("{field}: {err}")),
        }
    }
    Ok(outcome)
}

fn flatten_nested(field: &str, errors: &NestedErrors, into: &mut Vec<String>) {
    into.extend(
        errors
            .messages()
            .into_iter()
            .map(|message| format!("{field}: {message}")),
    );
}

fn to_wire<S: Serialize>(list: &S) -> Result<Value, InvalidValue> {
    serde_json::to_value(list).map_err(|err| InvalidValue::new(err.to_string()))
}

/// Edit payload for `PATCH /track`.
///
/// Cue points and tempo markers succeed partially: the usable entries are
/// placed in the payload even when others were reported.
pub fn normalize_edits(edits: &Value) -> Result<Outcome<Map<String, Value>>, InvalidValue> {
    let Value::Object(entries) = edits else {
        return Err(InvalidValue::new(format!(
            "Edits input must be a dict: {}",
            describe(edits)
        )));
    };

    let mut outcome = Outcome::<Map<String, Value>>::default();
    for (field, value) in entries {
        if !is_edit_field(field) {
            outcome.invalid_fields.push(field.clone());
            continue;
        }
        let normalized = match field.as_str() {
            "cuepoints" => {
                let (cues, errors) = normalize_cuepoints(value);
                flatten_nested(field, &errors, &mut outcome.value_errors);
                to_wire(&cues)
            }
            "tempomarkers" => {
                let (markers, errors) = normalize_tempomarkers(value);
                flatten_nested(field, &errors, &mut outcome.value_errors);
                to_wire(&markers)
            }
            "tags" => normalize_tag_ids(value),
            _ => match field_kind(field) {
                Some(kind) => normalize_kind(kind, value, FieldContext::Edit),
                None => Ok(value.clone()),
            },
        };
        match normalized {
            Ok(value) => {
                outcome.accepted.insert(field.clone(), value);
            }
            Err(err) => outcome.value_errors.push(format!("{field}: {err}")),
        }
    }
    Ok(outcome)
}

/// One `{field, dir?}` sort instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortEntry {
    pub field: String,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_dir")]
    pub dir: Option<SortDirection>,
}

fn serialize_dir<S: serde::Serializer>(
    dir: &Option<SortDirection>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match dir {
        Some(dir) => serializer.serialize_str(dir.as_str()),
        None => serializer.serialize_none(),
    }
}

impl SortEntry {
    pub fn new(field: impl Into<String>, dir: Option<SortDirection>) -> Self {
        Self {
            field: field.into(),
            dir,
        }
    }

    pub fn to_value(&self) -> Value {
        let mut entry = Map::new();
        entry.insert("field".into(), Value::from(self.field.as_str()));
        if let Some(dir) = self.dir {
            entry.insert("dir".into(), Value::from(dir.as_str()));
        }
        Value::Object(entry)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|x| x != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn display_plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Sort instructions as `{"field", "dir"}` objects or `[field, dir]` pairs.
pub fn normalize_sorts(sort: &Value) -> Result<Outcome<Vec<SortEntry>>, InvalidValue> {
    let items = match sort {
        Value::Array(items) => items,
        Value::String(_) => {
            return Err(InvalidValue::new("Sort must be a list/tuple, not a string"));
        }
        other => {
            return Err(InvalidValue::new(format!(
                "Sort input must be a list: {}",
                describe(other)
            )));
        }
    };

    let mut outcome = Outcome::<Vec<SortEntry>>::default();
    for item in items {
        let (field, direction) = match item {
            Value::Object(entry) => {
                let Some(field) = entry.get("field") else {
                    let keys: Vec<&str> = entry.keys().map(String::as_str).collect();
                    outcome
                        .value_errors
                        .push(format!("Invalid keys: [{}]", keys.join(", ")));
                    continue;
                };
                (field, entry.get("dir").unwrap_or(&Value::Null))
            }
            Value::Array(pair) if pair.len() == 2 => (&pair[0], &pair[1]),
            _ => continue,
        };

        let name = display_plain(field);
        if !field.as_str().is_some_and(is_sort_field) {
            outcome.invalid_fields.push(name);
            continue;
        }

        let mut dir = None;
        if is_truthy(direction) {
            dir = direction.as_str().and_then(SortDirection::parse);
            if dir.is_none() {
                outcome.value_errors.push(format!(
                    "Invalid sort direction for {name}: {}",
                    display_plain(direction)
                ));
            }
        }
        outcome.accepted.push(SortEntry::new(name, dir));
    }
    Ok(outcome)
}

/// Result of resolving the caller's return-field selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSelection {
    /// `None` means "omit the parameter and return every field".
    pub fields: Option<Vec<String>>,
    pub input_error: Option<String>,
    pub invalid_fields: Vec<String>,
}

/// Resolves return fields. `"all"` or `"*"` wins over `extra_fields`; a
/// missing or unusable selection falls back to the default fields.
pub fn normalize_fields(fields: Option<&Value>, extra_fields: &[String]) -> FieldSelection {
    let mut selection = FieldSelection::default();
    let defaults = || -> Vec<String> {
        DEFAULT_TRACK_FIELDS.iter().map(|f| f.to_string()).collect()
    };

    let mut requested: Vec<String> = match fields {
        None | Some(Value::Null) => defaults(),
        Some(Value::String(s)) => {
            if s.eq_ignore_ascii_case("all") || s == "*" {
                return selection;
            }
            selection.input_error = Some(format!("String input must be 'all' or '*': {s}"));
            defaults()
        }
        Some(Value::Array(items)) => items.iter().map(display_plain).collect(),
        Some(other) => {
            selection.input_error = Some(format!(
                "Fields must be a list of names, 'all' or '*': {other}"
            ));
            defaults()
        }
    };

    for extra in extra_fields {
        if !requested.contains(extra) {
            requested.push(extra.clone());
        }
    }

    let (valid, invalid): (Vec<String>, Vec<String>) =
        requested.into_iter().partition(|field| is_track_field(field));
    selection.fields = Some(valid);
    selection.invalid_fields = invalid;
    selection
}
