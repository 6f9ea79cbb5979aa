use serde_json::{Map, Value, json};
use tracing::warn;

use crate::{
    client::Lexicon,
    error::Result,
    normalize::{normalize_color, normalize_id_sequence},
    resources::{created_entity, data_field, decode, decode_each, raw_id_list},
    transport::{Request, Transport},
    types::TagCategory,
    validation::{CallOptions, ValidationMode, Verdict},
};

/// Optional changes for [`TagCategories::update`]. `tags` reorders or
/// replaces the category's tag ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryChanges {
    pub label: Option<String>,
    pub color: Option<Value>,
    pub tags: Option<Value>,
}

pub struct TagCategories<'a, T: Transport> {
    client: &'a Lexicon<T>,
}

/// The colour as sent: a palette name, `null` for none, or the raw input when
/// it did not map and the mode let it through.
fn wire_color(color: &Value, action: &str, mode: ValidationMode) -> Result<Option<Value>> {
    match normalize_color(color) {
        Ok(Some(color)) => Ok(Some(Value::from(color.name()))),
        Ok(None) => Ok(Some(Value::Null)),
        Err(err) => match mode.reject(format!("Invalid color for {action}: {err}"))? {
            Verdict::Proceed => Ok(Some(color.clone())),
            Verdict::Abort => Ok(None),
        },
    }
}

impl<'a, T: Transport> TagCategories<'a, T> {
    pub(crate) fn new(client: &'a Lexicon<T>) -> Self {
        Self { client }
    }

    pub async fn list(&self, opts: CallOptions) -> Result<Option<Vec<TagCategory>>> {
        let request = Request::get("/tags").timeout(opts.timeout);
        let Some(response) = self.client.request(request).await? else {
            return Ok(None);
        };
        match data_field(&response, "categories") {
            Some(Value::Array(categories)) => Ok(Some(decode_each(categories, "tag category"))),
            _ => {
                warn!("Tags response missing expected categories list.");
                Ok(None)
            }
        }
    }

    /// Creates a category.
    ///
    /// # Arguments
    ///
    /// * `label` - Display label
    /// * `color` - Anything the colour normalizer accepts; snapped to the nearest
    ///   palette colour. `None` or null leaves the category uncoloured.
    /// * `opts` - Validation mode and timeout for this call
    ///
    /// # Returns
    ///
    /// - `Ok(Some(TagCategory))` - The created category
    /// - `Ok(None)` - Invalid input in warn mode or a failed request
    pub async fn add(
        &self,
        label: &str,
        color: Option<&Value>,
        opts: CallOptions,
    ) -> Result<Option<TagCategory>> {
        let mode = opts.validation;
        if label.trim().is_empty()
            && mode.reject(format!("Invalid label for add: {label:?}"))? == Verdict::Abort
        {
            return Ok(None);
        }

        let mut payload = Map::new();
        payload.insert("label".into(), Value::from(label));
        if let Some(color) = color {
            let Some(color) = wire_color(color, "add", mode)? else {
                return Ok(None);
            };
            if !color.is_null() {
                payload.insert("color".into(), color);
            }
        }

        let request = Request::post("/tag-category")
            .json(Value::Object(payload))
            .timeout(opts.timeout);
        let Some(response) = self.client.request(request).await? else {
            return Ok(None);
        };
        match created_entity(&response) {
            Some(category) => Ok(decode(category, "tag category")),
            None => {
                warn!(
                    "Create tag category response missing expected data. Response was {response}"
                );
                Ok(None)
            }
        }
    }

    /// Changes the label, colour or tag list of a category.
    ///
    /// `changes.tags` replaces the category's tags and goes through the id list
    /// normalizer.
    pub async fn update(
        &self,
        category_id: i64,
        changes: &CategoryChanges,
        opts: CallOptions,
    ) -> Result<Option<TagCategory>> {
        let mode = opts.validation;
        if category_id < 1
            && mode.reject(format!("Invalid category_id for update: {category_id}"))?
                == Verdict::Abort
        {
            return Ok(None);
        }
        if let Some(label) = changes.label.as_ref().filter(|l| l.trim().is_empty()) {
            if mode.reject(format!("Invalid label for update: {label:?}"))? == Verdict::Abort {
                return Ok(None);
            }
        }

        let mut payload = Map::new();
        payload.insert("id".into(), Value::from(category_id));
        if let Some(label) = &changes.label {
            payload.insert("label".into(), Value::from(label.as_str()));
        }
        if let Some(color) = &changes.color {
            let Some(color) = wire_color(color, "update", mode)? else {
                return Ok(None);
            };
            if !color.is_null() {
                payload.insert("color".into(), color);
            }
        }
        if let Some(tags) = &changes.tags {
            let tags = if mode.is_off() {
                raw_id_list(tags)
            } else {
                match normalize_id_sequence(tags) {
                    Some(valid) => Value::from(valid),
                    None => {
                        mode.reject(format!("Invalid tags for update: {tags}"))?;
                        return Ok(None);
                    }
                }
            };
            payload.insert("tags".into(), tags);
        }
        if payload.len() == 1 {
            warn!("No updates provided for tag category {category_id}");
            return Ok(None);
        }

        let request = Request::patch("/tag-category")
            .json(Value::Object(payload))
            .timeout(opts.timeout);
        let Some(response) = self.client.request(request).await? else {
            return Ok(None);
        };
        match created_entity(&response) {
            Some(category) => Ok(decode(category, "tag category")),
            None => {
                warn!("Update tag category response missing expected data.");
                Ok(None)
            }
        }
    }

    /// Deletes categories one request at a time, stopping at the first failure.
    pub async fn delete(&self, ids: impl Into<Value>, opts: CallOptions) -> Result<bool> {
        let ids: Value = ids.into();
        let targets: Vec<Value> = if opts.validation.is_off() {
            raw_id_list(&ids).as_array().cloned().unwrap_or_default()
        } else {
            match normalize_id_sequence(&ids) {
                Some(valid) => valid.into_iter().map(Value::from).collect(),
                None => {
                    opts.validation
                        .reject(format!("Invalid category_ids for delete: {ids}"))?;
                    return Ok(false);
                }
            }
        };

        for category_id in targets {
            let request = Request::delete("/tag-category")
                .json(json!({ "id": category_id }))
                .timeout(opts.timeout);
            if self.client.request(request).await?.is_none() {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
