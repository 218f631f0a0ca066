//! JSON API projection.
//!
//! Writes the denormalized output tree consumed by the front-end at build
//! time: a summary index per category, one file per entity, and by-parent
//! grouping files that resolve each child's parent slug to the parent's id.
//! Output files are fully overwritten on every run; orphaned files from
//! removed entities are not cleaned up.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use tokio::fs;
use tracing::{info, warn};

use crate::content::{Category, ContentSet, Record};

/// Per-category entity counts from a generation run.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenerateSummary {
    pub themes: usize,
    pub topics: usize,
    pub exercises: usize,
    pub videos: usize,
}

/// One-shot generator: loads the content tree and projects it into the
/// output directory.
pub struct ApiGenerator {
    content_dir: PathBuf,
    api_dir: PathBuf,
}

impl ApiGenerator {
    pub fn new(content_dir: impl Into<PathBuf>, api_dir: impl Into<PathBuf>) -> Self {
        Self {
            content_dir: content_dir.into(),
            api_dir: api_dir.into(),
        }
    }

    /// Load all content and write the full output tree.
    pub async fn generate(&self) -> Result<GenerateSummary> {
        if !self.content_dir.exists() {
            anyhow::bail!(
                "content directory not found: {}",
                self.content_dir.display()
            );
        }

        let content = ContentSet::load(&self.content_dir).await?;
        self.ensure_output_dirs().await?;

        for category in Category::ALL {
            let count = content.category(category).len();
            info!("processed {} {} entries", count, category.dir_name());

            self.write_index(category, &content).await?;
            self.write_entities(category, &content).await?;
            self.write_groupings(category, &content).await?;
        }

        Ok(GenerateSummary {
            themes: content.themes.len(),
            topics: content.topics.len(),
            exercises: content.exercises.len(),
            videos: content.videos.len(),
        })
    }

    async fn ensure_output_dirs(&self) -> Result<()> {
        for category in Category::ALL {
            let dir = self.api_dir.join(category.dir_name());
            let dir = match category.parent() {
                Some(link) => dir.join(link.dir),
                None => dir,
            };
            fs::create_dir_all(&dir)
                .await
                .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
        }
        Ok(())
    }

    /// Write `<category>/index.json`: every entity reduced to the category's
    /// display fields, in mapping insertion order.
    async fn write_index(&self, category: Category, content: &ContentSet) -> Result<()> {
        let index: Vec<Value> = content
            .category(category)
            .values()
            .filter_map(Value::as_object)
            .map(|record| Value::Object(project(record, category.index_fields())))
            .collect();

        let path = self.api_dir.join(category.dir_name()).join("index.json");
        write_json(&path, &Value::Array(index)).await
    }

    /// Write `<category>/<id>.json` with the full record for every entity.
    async fn write_entities(&self, category: Category, content: &ContentSet) -> Result<()> {
        let dir = self.api_dir.join(category.dir_name());
        for (id, record) in content.category(category) {
            write_json(&dir.join(format!("{}.json", id)), record).await?;
        }
        Ok(())
    }

    /// Write `<category>/<by-parent>/<parentId>.json` grouping files.
    ///
    /// Children are bucketed by their parent-slug field in encounter order;
    /// each bucket resolves its slug against the parent mapping. Buckets
    /// whose slug matches no loaded parent are dropped.
    async fn write_groupings(&self, category: Category, content: &ContentSet) -> Result<()> {
        let Some(link) = category.parent() else {
            return Ok(());
        };

        // Grouping entries are the index projection minus the parent
        // reference fields, which are redundant inside a by-parent file.
        let group_fields: Vec<&str> = category
            .index_fields()
            .iter()
            .copied()
            .filter(|field| *field != "theme" && *field != "topic")
            .collect();

        let mut buckets: Vec<(String, Vec<Value>)> = Vec::new();
        for record in content.category(category).values().filter_map(Value::as_object) {
            let Some(slug) = record.get(link.field).and_then(Value::as_str) else {
                let id = record.get("id").and_then(Value::as_str).unwrap_or("?");
                warn!(
                    "{} {:?} has no {} reference, dropped from grouping",
                    category, id, link.field
                );
                continue;
            };
            let entry = Value::Object(project(record, &group_fields));
            match buckets.iter_mut().find(|(s, _)| s.as_str() == slug) {
                Some((_, entries)) => entries.push(entry),
                None => buckets.push((slug.to_string(), vec![entry])),
            }
        }

        let dir = self.api_dir.join(category.dir_name()).join(link.dir);
        for (slug, entries) in buckets {
            match content.resolve_parent_id(link.category, &slug) {
                Some(parent_id) => {
                    let path = dir.join(format!("{}.json", parent_id));
                    write_json(&path, &Value::Array(entries)).await?;
                }
                None => warn!(
                    "no {} with slug '{}', dropping {} {} from grouping files",
                    link.category,
                    slug,
                    entries.len(),
                    category.dir_name()
                ),
            }
        }

        Ok(())
    }
}

/// Copy the whitelisted fields that are present on the record, in whitelist
/// order. Absent fields are omitted, never emitted as null.
fn project(record: &Record, fields: &[&str]) -> Record {
    let mut projected = Map::new();
    for field in fields {
        if let Some(value) = record.get(*field) {
            projected.insert((*field).to_string(), value.clone());
        }
    }
    projected
}

/// Write a value as pretty-printed JSON (2-space indentation).
async fn write_json(path: &Path, value: &Value) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_project_keeps_whitelist_order_and_skips_missing() {
        let record = json!({
            "slug": "intro",
            "id": "abc",
            "extra": "dropped",
            "title": "Intro"
        });
        let record = record.as_object().unwrap();

        let projected = project(record, &["id", "title", "slug", "difficulty"]);
        let keys: Vec<&str> = projected.keys().map(String::as_str).collect();

        assert_eq!(keys, vec!["id", "title", "slug"]);
        assert_eq!(projected["id"], json!("abc"));
    }
}
