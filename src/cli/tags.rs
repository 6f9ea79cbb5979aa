use std::collections::HashMap;

use tabled::Table;

use crate::{
    Lexicon, error, info, success,
    types::{CategoryTableRow, TagTableRow},
    validation::CallOptions,
    warning,
};

pub async fn list_tags(lexicon: &Lexicon, opts: CallOptions) {
    let tags = match lexicon.tags().list(opts).await {
        Ok(Some(tags)) => tags,
        Ok(None) => {
            warning!("Tags unavailable.");
            return;
        }
        Err(e) => error!("Cannot list tags. Err: {}", e),
    };

    // category labels are a nicety, tags print without them
    let categories: HashMap<i64, String> = match lexicon.categories().list(opts).await {
        Ok(Some(categories)) => categories.into_iter().map(|c| (c.id, c.label)).collect(),
        _ => HashMap::new(),
    };

    if tags.is_empty() {
        info!("No tags found.");
        return;
    }
    let rows: Vec<TagTableRow> = tags
        .iter()
        .map(|tag| TagTableRow {
            id: tag.id,
            category: tag
                .category_id
                .and_then(|id| categories.get(&id).cloned())
                .unwrap_or_default(),
            label: tag.label.clone(),
        })
        .collect();
    println!("{}", Table::new(rows));
}

pub async fn add_tag(lexicon: &Lexicon, category_id: i64, label: &str, opts: CallOptions) {
    match lexicon.tags().add(category_id, label, opts).await {
        Ok(Some(tag)) => success!("Created tag {} (id {})", tag.label, tag.id),
        Ok(None) => warning!("Tag was not created."),
        Err(e) => error!("Cannot create tag. Err: {}", e),
    }
}

pub async fn delete_tags(lexicon: &Lexicon, tag_ids: &[i64], opts: CallOptions) {
    match lexicon.tags().delete(tag_ids.to_vec(), opts).await {
        Ok(true) => success!("Deleted {} tags", tag_ids.len()),
        Ok(false) => warning!("Tags were not all deleted."),
        Err(e) => error!("Cannot delete tags. Err: {}", e),
    }
}

pub async fn list_categories(lexicon: &Lexicon, opts: CallOptions) {
    match lexicon.categories().list(opts).await {
        Ok(Some(categories)) if categories.is_empty() => info!("No tag categories found."),
        Ok(Some(categories)) => {
            let rows: Vec<CategoryTableRow> =
                categories.iter().map(CategoryTableRow::from).collect();
            println!("{}", Table::new(rows));
        }
        Ok(None) => warning!("Tag categories unavailable."),
        Err(e) => error!("Cannot list tag categories. Err: {}", e),
    }
}
