//! Fixed-depth content tree walker.
//!
//! Enumerates category folders level by level, loads `metadata.md` plus the
//! category's auxiliary files at each leaf, and accumulates records keyed by
//! their `id` field. Leaves without a metadata file are skipped; records
//! without a usable id never enter the mapping (nothing downstream could
//! address them).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use tokio::fs;
use tracing::{debug, warn};

use super::{Category, Record, METADATA_FILE};
use crate::frontmatter::Document;

/// All loaded content: one insertion-ordered id -> record mapping per
/// category. Every value in the mappings is a JSON object.
#[derive(Debug, Default)]
pub struct ContentSet {
    pub themes: Map<String, Value>,
    pub topics: Map<String, Value>,
    pub exercises: Map<String, Value>,
    pub videos: Map<String, Value>,
}

impl ContentSet {
    /// Load every category from the content root.
    ///
    /// Category roots that do not exist load as empty mappings.
    pub async fn load(content_dir: &Path) -> Result<Self> {
        let mut set = Self::default();
        for category in Category::ALL {
            set.load_category(content_dir, category).await?;
        }
        Ok(set)
    }

    /// The id -> record mapping for a category.
    pub fn category(&self, category: Category) -> &Map<String, Value> {
        match category {
            Category::Theme => &self.themes,
            Category::Topic => &self.topics,
            Category::Exercise => &self.exercises,
            Category::Video => &self.videos,
        }
    }

    fn category_mut(&mut self, category: Category) -> &mut Map<String, Value> {
        match category {
            Category::Theme => &mut self.themes,
            Category::Topic => &mut self.topics,
            Category::Exercise => &mut self.exercises,
            Category::Video => &mut self.videos,
        }
    }

    /// Resolve a parent slug to the parent's id. Linear scan over the parent
    /// mapping, first match wins.
    pub fn resolve_parent_id(&self, parent: Category, slug: &str) -> Option<&str> {
        self.category(parent).iter().find_map(|(id, record)| {
            (record.get("slug").and_then(Value::as_str) == Some(slug)).then_some(id.as_str())
        })
    }

    async fn load_category(&mut self, content_dir: &Path, category: Category) -> Result<()> {
        let root = content_dir.join(category.dir_name());
        if !root.exists() {
            debug!("no {} directory, skipping category", root.display());
            return Ok(());
        }

        let depth = category.folder_fields().len();
        for leaf in enumerate_leaves(&root, depth).await? {
            let Some(record) = load_record(&leaf, category).await? else {
                continue;
            };
            let id = record
                .get("id")
                .and_then(Value::as_str)
                .filter(|id| !id.is_empty())
                .map(str::to_string);
            match id {
                Some(id) => {
                    self.category_mut(category).insert(id, Value::Object(record));
                }
                None => warn!(
                    "skipping {} at {}: metadata has no usable id",
                    category,
                    leaf.path.display()
                ),
            }
        }

        Ok(())
    }
}

/// A leaf directory plus the folder names on the path from the category root.
struct Leaf {
    path: PathBuf,
    folders: Vec<String>,
}

/// Enumerate leaf directories `depth` levels below `root`, silently skipping
/// non-directory entries, in readdir order.
async fn enumerate_leaves(root: &Path, depth: usize) -> Result<Vec<Leaf>> {
    let mut leaves = vec![Leaf {
        path: root.to_path_buf(),
        folders: Vec::new(),
    }];

    for _ in 0..depth {
        let mut next = Vec::new();
        for leaf in leaves {
            let mut entries = fs::read_dir(&leaf.path)
                .await
                .with_context(|| format!("Failed to read directory: {}", leaf.path.display()))?;

            while let Some(entry) = entries.next_entry().await? {
                if !entry.file_type().await?.is_dir() {
                    continue;
                }
                let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                    continue;
                };
                let mut folders = leaf.folders.clone();
                folders.push(name);
                next.push(Leaf {
                    path: entry.path(),
                    folders,
                });
            }
        }
        leaves = next;
    }

    Ok(leaves)
}

/// Assemble the record for one leaf: frontmatter fields, auxiliary bodies,
/// folder tags, then the category tag. `None` when `metadata.md` is absent.
async fn load_record(leaf: &Leaf, category: Category) -> Result<Option<Record>> {
    let metadata_path = leaf.path.join(METADATA_FILE);
    if !metadata_path.exists() {
        debug!("no metadata.md in {}, skipping leaf", leaf.path.display());
        return Ok(None);
    }

    let text = fs::read_to_string(&metadata_path)
        .await
        .with_context(|| format!("Failed to read {}", metadata_path.display()))?;
    let mut record = Document::parse(&text).matter;

    for (file, field) in category.aux_files() {
        let path = leaf.path.join(file);
        let body = if path.exists() {
            let text = fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Document::parse(&text).body
        } else {
            String::new()
        };
        record.insert((*field).to_string(), Value::String(body));
    }

    for (field, folder) in category.folder_fields().iter().zip(&leaf.folders) {
        record.insert((*field).to_string(), Value::String(folder.clone()));
    }

    record.insert(
        "type".to_string(),
        Value::String(category.tag().to_string()),
    );

    Ok(Some(record))
}
