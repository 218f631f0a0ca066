//! UUID assignment for metadata files.
//!
//! Walks the content tree, finds every `metadata.md`, and rewrites in place
//! any file whose header lacks an `id` key. The rewrite reserializes the
//! header but preserves the body byte-for-byte. This mutates source files
//! with no backup or dry-run mode; the tree is expected to be under version
//! control.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::content::METADATA_FILE;
use crate::frontmatter::{self, RawMatter};

/// Counts from an assignment run.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssignSummary {
    /// metadata.md files discovered
    pub found: usize,

    /// files rewritten with a new id
    pub modified: usize,
}

/// One-shot id assigner over a content root.
pub struct IdAssigner {
    content_dir: PathBuf,
}

impl IdAssigner {
    pub fn new(content_dir: impl Into<PathBuf>) -> Self {
        Self {
            content_dir: content_dir.into(),
        }
    }

    /// Discover and process every metadata file. Running twice over the same
    /// tree is idempotent: the second run modifies nothing.
    pub async fn run(&self) -> Result<AssignSummary> {
        if !self.content_dir.exists() {
            anyhow::bail!(
                "content directory not found: {}",
                self.content_dir.display()
            );
        }

        let files = find_metadata_files(&self.content_dir).await?;
        info!("found {} metadata files", files.len());

        let mut summary = AssignSummary {
            found: files.len(),
            modified: 0,
        };
        for path in &files {
            if process_file(path).await? {
                summary.modified += 1;
            }
        }

        Ok(summary)
    }
}

/// Assign an id to one metadata file if it needs one. Returns whether the
/// file was rewritten.
async fn process_file(path: &Path) -> Result<bool> {
    info!("processing {}", path.display());

    let text = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let Some((header, body)) = frontmatter::split(&text) else {
        warn!("{} has no frontmatter header, skipping", path.display());
        return Ok(false);
    };
    if header.is_empty() {
        warn!("{} has an empty frontmatter header, skipping", path.display());
        return Ok(false);
    }

    let mut matter = RawMatter::parse(header);

    // Key presence alone short-circuits, whatever the value.
    if matter.contains("id") {
        debug!(
            "{} already has id {}",
            path.display(),
            matter.get("id").unwrap_or_default()
        );
        return Ok(false);
    }

    let id = Uuid::new_v4().to_string();
    matter.set("id", &id);

    let rewritten = format!("---\n{}\n---\n{}", matter.to_header(), body);
    fs::write(path, rewritten)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!("assigned id {} to {}", id, path.display());
    Ok(true)
}

/// Recursively collect every metadata.md under `root`, depth-first in
/// readdir order.
async fn find_metadata_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut entries = fs::read_dir(&dir)
            .await
            .with_context(|| format!("Failed to read directory: {}", dir.display()))?;

        let mut subdirs = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                subdirs.push(entry.path());
            } else if entry.file_name() == METADATA_FILE {
                files.push(entry.path());
            }
        }

        // Keep readdir order across the stack
        subdirs.reverse();
        pending.extend(subdirs);
    }

    Ok(files)
}
