//! Per-kind value normalizers.
//!
//! Each function turns one loosely-typed input into the exact wire value the
//! API expects for that field kind, or returns [`InvalidValue`].

use std::{
    collections::BTreeSet,
    sync::LazyLock,
};

use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;

use crate::{
    error::InvalidValue,
    normalize::fields::{FieldContext, FieldKind},
    utils::unique_in_order,
};

/// The server's "field is absent" token in filters.
pub const NONE_SENTINEL: &str = "NONE";

static NONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*none\s*$").expect("valid regex"));
static RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+(?:\.\d+)?)\s*-\s*(\d+(?:\.\d+)?)\s*$").expect("valid regex")
});
static COMPARE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[<>!]|<=|>=)?\s*\d+(?:\.\d+)?\s*$").expect("valid regex")
});
static DELTA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[+-]?\d+(?:\.\d+)?\s*$").expect("valid regex"));
static FILTER_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<op>[<>]=?)?\s*(?P<date>\d{4}-\d{2}-\d{2})").expect("valid regex")
});
static EDIT_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4}-\d{2}-\d{2})").expect("valid regex"));
static TAG_FILTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*~?\s*!?[^,]+(?:\s*,\s*!?[^,]+)*\s*$").expect("valid regex")
});

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

/// Bool-like input to the API's `0`/`1`.
pub fn normalize_bool(value: &Value) -> Result<Value, InvalidValue> {
    let flag = match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_f64() {
            Some(x) if x == 0.0 => Some(false),
            Some(x) if x == 1.0 => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" => Some(true),
            "0" | "false" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    };
    flag.map(|b| Value::from(u8::from(b))).ok_or_else(|| {
        InvalidValue::new(format!("Input must be bool-like. Given [{value}]"))
    })
}

pub fn normalize_text(value: &Value, context: FieldContext) -> Result<Value, InvalidValue> {
    match (value, context) {
        (Value::Null, FieldContext::Filter) => Ok(Value::from(NONE_SENTINEL)),
        (Value::Null, FieldContext::Edit) | (Value::String(_), _) => Ok(value.clone()),
        _ => Err(InvalidValue::new(format!(
            "Input must be [str | None]. Given [{}]",
            type_name(value)
        ))),
    }
}

/// Numbers, ranges, comparisons (filter) and relative deltas (edit).
///
/// Strings are validated but never evaluated; the server applies ranges and
/// deltas itself.
pub fn normalize_number(value: &Value, context: FieldContext) -> Result<Value, InvalidValue> {
    match value {
        Value::Null => Ok(match context {
            FieldContext::Filter => Value::from("0"),
            FieldContext::Edit => Value::Null,
        }),
        Value::Number(n) => match n.as_f64() {
            Some(x) if x > 0.0 => Ok(value.clone()),
            _ => Err(InvalidValue::new(format!(
                "Numbers must be positive. Given: {value}"
            ))),
        },
        Value::String(s) => match context {
            FieldContext::Filter => {
                if NONE_RE.is_match(s) {
                    return Ok(Value::from("0"));
                }
                if let Some(caps) = RANGE_RE.captures(s) {
                    return Ok(Value::from(format!("{}-{}", &caps[1], &caps[2])));
                }
                if COMPARE_RE.is_match(s) {
                    return Ok(value.clone());
                }
                Err(InvalidValue::new(format!(
                    "String input does not match range, inequality, or exclusion patterns. \
                     Given [{s:?}]"
                )))
            }
            FieldContext::Edit => {
                if DELTA_RE.is_match(s) {
                    Ok(Value::from(s.trim()))
                } else {
                    Err(InvalidValue::new(format!(
                        "Input must be numeric or +/- delta string. Given [{s:?}]"
                    )))
                }
            }
        },
        _ => Err(InvalidValue::new(format!(
            "Input must be numerical [str | int | float]. Given [{}]",
            type_name(value)
        ))),
    }
}

/// The `YYYY-MM-DD` prefix must name a real calendar day.
fn calendar_date(iso: &str) -> Result<Value, InvalidValue> {
    NaiveDate::parse_from_str(iso, "%Y-%m-%d")
        .map(|date| Value::from(date.format("%Y-%m-%d").to_string()))
        .map_err(|_| InvalidValue::new(format!("Not a calendar date. Given [{iso:?}]")))
}

/// Dates render as `YYYY-MM-DD`; any trailing time component is discarded.
///
/// `chrono` dates and datetimes arrive here through their serde string form,
/// so `json!(NaiveDateTime)` is handled by the prefix match.
pub fn normalize_date(value: &Value, context: FieldContext) -> Result<Value, InvalidValue> {
    let absent = || match context {
        FieldContext::Filter => Value::from(NONE_SENTINEL),
        FieldContext::Edit => Value::Null,
    };
    match value {
        Value::Null => Ok(absent()),
        Value::String(s) if s.trim().eq_ignore_ascii_case("none") => Ok(absent()),
        Value::String(s) => match context {
            FieldContext::Filter => {
                let caps = FILTER_DATE_RE.captures(s).ok_or_else(|| {
                    InvalidValue::new(format!(
                        "Input must be in YYYY-MM-DD format. Given [{s:?}]"
                    ))
                })?;
                if caps.name("op").is_some() {
                    return Err(InvalidValue::new(
                        "Comparison operators on date filters are not supported by the API",
                    ));
                }
                calendar_date(&caps["date"])
            }
            FieldContext::Edit => {
                let caps = EDIT_DATE_RE.captures(s).ok_or_else(|| {
                    InvalidValue::new(format!("Input must be YYYY-MM-DD. Given [{s:?}]"))
                })?;
                calendar_date(&caps[1])
            }
        },
        _ => Err(InvalidValue::new(format!(
            "Input must be a date. Given [{}]",
            type_name(value)
        ))),
    }
}

/// A comma-separated tag filter such as `~House, !Vocal`.
pub fn normalize_tag_filter(value: &Value) -> Result<Value, InvalidValue> {
    match value {
        Value::Null => Err(InvalidValue::new(
            "API does not support filtering on absence of tags",
        )),
        Value::String(s) if TAG_FILTER_RE.is_match(s) => Ok(value.clone()),
        Value::String(s) => Err(InvalidValue::new(format!(
            "Tag filter string is invalid. Given [{s:?}]"
        ))),
        _ => Err(InvalidValue::new(format!(
            "Input must be [str]. Given [{}]",
            type_name(value)
        ))),
    }
}

/// The tag id list of an edit. Treated as a set: duplicates collapse and the
/// result comes back in ascending id order.
pub fn normalize_tag_ids(value: &Value) -> Result<Value, InvalidValue> {
    let Value::Array(items) = value else {
        return Err(InvalidValue::new(format!(
            "Input must be list[int]. Given [{}]",
            type_name(value)
        )));
    };
    let ids: BTreeSet<i64> = items
        .iter()
        .filter_map(Value::as_i64)
        .filter(|id| *id >= 1)
        .collect();
    if ids.is_empty() {
        return Err(InvalidValue::new("Tag list must contain positive ints"));
    }
    Ok(Value::from(ids.into_iter().collect::<Vec<_>>()))
}

/// One id or a list of ids, reduced to the distinct ids `>= 1` in order of
/// first occurrence. `None` when the shape is wrong or nothing survives.
pub fn normalize_id_sequence(ids: &Value) -> Option<Vec<i64>> {
    let candidates: Vec<i64> = match ids {
        Value::Number(_) => ids.as_i64().into_iter().collect(),
        Value::Array(items) => items.iter().filter_map(Value::as_i64).collect(),
        _ => return None,
    };
    let valid = unique_in_order(candidates.into_iter().filter(|id| *id >= 1));
    if valid.is_empty() { None } else { Some(valid) }
}

/// Dispatches a value to the normalizer for its kind.
pub fn normalize_kind(
    kind: FieldKind,
    value: &Value,
    context: FieldContext,
) -> Result<Value, InvalidValue> {
    match (kind, context) {
        (FieldKind::Bool, _) => normalize_bool(value),
        (FieldKind::Text, _) => normalize_text(value, context),
        (FieldKind::Number, _) => normalize_number(value, context),
        (FieldKind::Date, _) => normalize_date(value, context),
        (FieldKind::Tag, FieldContext::Filter) => normalize_tag_filter(value),
        (FieldKind::Tag, FieldContext::Edit) => normalize_tag_ids(value),
    }
}
