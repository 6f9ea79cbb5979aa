use serde_json::{Map, Value, json};
use tracing::warn;

use crate::{
    client::Lexicon,
    error::Result,
    normalize::normalize_id_sequence,
    resources::{created_entity, data_field, decode, decode_each, raw_id_list},
    transport::{Request, Transport},
    types::Tag,
    validation::{CallOptions, Verdict},
};

/// Optional changes for [`Tags::update`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagChanges {
    pub category_id: Option<i64>,
    pub label: Option<String>,
    pub position: Option<i64>,
}

pub struct Tags<'a, T: Transport> {
    client: &'a Lexicon<T>,
}

impl<'a, T: Transport> Tags<'a, T> {
    pub(crate) fn new(client: &'a Lexicon<T>) -> Self {
        Self { client }
    }

    /// Every tag in the library.
    pub async fn list(&self, opts: CallOptions) -> Result<Option<Vec<Tag>>> {
        let request = Request::get("/tags").timeout(opts.timeout);
        let Some(response) = self.client.request(request).await? else {
            return Ok(None);
        };
        match data_field(&response, "tags") {
            Some(Value::Array(tags)) => Ok(Some(decode_each(tags, "tag"))),
            _ => {
                warn!("Tags response missing expected tags list.");
                Ok(None)
            }
        }
    }

    /// Creates a tag inside a category.
    ///
    /// # Arguments
    ///
    /// * `category_id` - Category the tag belongs to
    /// * `label` - Non-blank tag label
    /// * `opts` - Validation mode and timeout for this call
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Tag))` - The created tag
    /// - `Ok(None)` - Invalid input in warn mode or a failed request
    ///
    /// # Errors
    ///
    /// Strict mode raises on a category id below 1 or a blank label.
    pub async fn add(
        &self,
        category_id: i64,
        label: &str,
        opts: CallOptions,
    ) -> Result<Option<Tag>> {
        let mode = opts.validation;
        if category_id < 1
            && mode.reject(format!("Invalid category_id for add: {category_id}"))? == Verdict::Abort
        {
            return Ok(None);
        }
        if label.trim().is_empty()
            && mode.reject(format!("Invalid label for add: {label:?}"))? == Verdict::Abort
        {
            return Ok(None);
        }

        let request = Request::post("/tag")
            .json(json!({ "categoryId": category_id, "label": label }))
            .timeout(opts.timeout);
        let Some(response) = self.client.request(request).await? else {
            return Ok(None);
        };
        match created_entity(&response) {
            Some(tag) => Ok(decode(tag, "tag")),
            None => {
                warn!("Create tag response missing expected data. Response was {response}");
                Ok(None)
            }
        }
    }

    /// Renames, moves or re-orders a tag.
    ///
    /// Only the set fields of `changes` are sent. An empty change set sends
    /// nothing and returns `None` with a warning.
    ///
    /// # Errors
    ///
    /// Strict mode raises on the first invalid id, category, label or position.
    pub async fn update(
        &self,
        tag_id: i64,
        changes: &TagChanges,
        opts: CallOptions,
    ) -> Result<Option<Tag>> {
        let mode = opts.validation;
        let mut problems = Vec::new();
        if tag_id < 1 {
            problems.push(format!("Invalid tag_id for update: {tag_id}"));
        }
        if let Some(category) = changes.category_id.filter(|c| *c < 1) {
            problems.push(format!("Invalid category_id for update: {category}"));
        }
        if let Some(label) = changes.label.as_ref().filter(|l| l.trim().is_empty()) {
            problems.push(format!("Invalid label for update: {label:?}"));
        }
        if let Some(position) = changes.position.filter(|p| *p < 0) {
            problems.push(format!("Invalid position for update: {position}"));
        }
        if let Some(problem) = problems.into_iter().next() {
            if mode.reject(problem)? == Verdict::Abort {
                return Ok(None);
            }
        }

        let mut payload = Map::new();
        payload.insert("id".into(), Value::from(tag_id));
        if let Some(category) = changes.category_id {
            payload.insert("categoryId".into(), Value::from(category));
        }
        if let Some(label) = &changes.label {
            payload.insert("label".into(), Value::from(label.as_str()));
        }
        if let Some(position) = changes.position {
            payload.insert("position".into(), Value::from(position));
        }
        if payload.len() == 1 {
            warn!("No updates provided for tag {tag_id}");
            return Ok(None);
        }

        let request = Request::patch("/tag")
            .json(Value::Object(payload))
            .timeout(opts.timeout);
        let Some(response) = self.client.request(request).await? else {
            return Ok(None);
        };
        match created_entity(&response) {
            Some(tag) => Ok(decode(tag, "tag")),
            None => {
                warn!("Update tag response missing expected data.");
                Ok(None)
            }
        }
    }

    /// Deletes tags one request at a time, stopping at the first failure.
    ///
    /// # Returns
    ///
    /// `true` when every tag was deleted.
    pub async fn delete(&self, ids: impl Into<Value>, opts: CallOptions) -> Result<bool> {
        let ids: Value = ids.into();
        let targets: Vec<Value> = if opts.validation.is_off() {
            raw_id_list(&ids).as_array().cloned().unwrap_or_default()
        } else {
            match normalize_id_sequence(&ids) {
                Some(valid) => valid.into_iter().map(Value::from).collect(),
                None => {
                    opts.validation
                        .reject(format!("Invalid tag_ids for delete: {ids}"))?;
                    return Ok(false);
                }
            }
        };

        for tag_id in targets {
            let request = Request::delete("/tag")
                .json(json!({ "id": tag_id }))
                .timeout(opts.timeout);
            if self.client.request(request).await?.is_none() {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
