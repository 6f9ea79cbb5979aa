use std::{collections::HashSet, hash::Hash};

use colored::Colorize;
use serde_json::Value;

use crate::{
    normalize::{SortDirection, SortEntry},
    types::Playlist,
    validation::ValidationMode,
};

/// Distinct values in order of first occurrence.
pub fn unique_in_order<T>(values: impl IntoIterator<Item = T>) -> Vec<T>
where
    T: Eq + Hash + Copy,
{
    let mut seen = HashSet::new();
    values.into_iter().filter(|value| seen.insert(*value)).collect()
}

/// Names from the tree root down to `playlist_id`.
///
/// Walks the `/playlists` tree depth-first. The synthetic `ROOT` folder is
/// dropped from the front of the path unless it is the only component.
///
/// # Example
///
/// ```
/// let path = get_path_from_tree(&root, 42); // Some(["Sets", "Warmup"])
/// ```
pub fn get_path_from_tree(tree: &Playlist, playlist_id: i64) -> Option<Vec<String>> {
    if playlist_id < 1 {
        return None;
    }

    fn walk(node: &Playlist, mut path: Vec<String>, target: i64) -> Option<Vec<String>> {
        path.push(node.name.clone());
        if node.id == target {
            return Some(path);
        }
        node.playlists
            .iter()
            .find_map(|child| walk(child, path.clone(), target))
    }

    let mut path = walk(tree, Vec::new(), playlist_id)?;
    if path.len() > 1 && path[0].eq_ignore_ascii_case("root") {
        path.remove(0);
    }
    Some(path)
}

/// Renders the playlist tree as indented lines, folders in bold.
pub fn render_playlist_tree(tree: &Playlist) -> Vec<String> {
    fn render(node: &Playlist, depth: usize, lines: &mut Vec<String>) {
        let label = if node.is_folder() {
            node.name.bold().to_string()
        } else {
            node.name.clone()
        };
        lines.push(format!(
            "{}{} {}",
            "  ".repeat(depth),
            label,
            format!("({})", node.id).dimmed()
        ));
        for child in &node.playlists {
            render(child, depth + 1, lines);
        }
    }

    let mut lines = Vec::new();
    if tree.name.eq_ignore_ascii_case("root") {
        for child in &tree.playlists {
            render(child, 0, &mut lines);
        }
    } else {
        render(tree, 0, &mut lines);
    }
    lines
}

/// Parses `field=value` from the command line. The value is read as JSON when
/// it parses, so `bpm=128` is a number and `tags=[1,2]` a list; anything else
/// is kept as a string.
pub fn parse_assignment(s: &str) -> Result<(String, Value), String> {
    let (field, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("expected field=value, got '{s}'"))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field name in '{s}'"));
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::from(raw));
    Ok((field.to_string(), value))
}

/// Parses `field` or `field:asc|desc`.
pub fn parse_sort(s: &str) -> Result<SortEntry, String> {
    match s.split_once(':') {
        Some((field, dir)) => {
            let dir = SortDirection::parse(&dir.to_ascii_lowercase())
                .ok_or_else(|| format!("invalid sort direction '{dir}'; expected asc or desc"))?;
            Ok(SortEntry::new(field.trim(), Some(dir)))
        }
        None => Ok(SortEntry::new(s.trim(), None)),
    }
}

pub fn parse_validation_mode(s: &str) -> Result<ValidationMode, String> {
    s.parse()
}

/// Builds the `field -> value` object the normalizers expect from CLI pairs.
pub fn assignments_to_object(pairs: &[(String, Value)]) -> Value {
    Value::Object(pairs.iter().cloned().collect())
}
