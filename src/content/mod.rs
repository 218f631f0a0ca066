//! Content tree model.
//!
//! Four categories of markdown content live under fixed roots at fixed
//! nesting depths. Each category is described by a static descriptor: where
//! it lives, which folder names get recorded on the record, which auxiliary
//! files fill which body fields, and which summary fields its index exposes.

pub mod walker;

pub use walker::ContentSet;

use serde_json::{Map, Value};

/// A single content entity: frontmatter fields, auxiliary bodies and
/// structural folder tags merged into one insertion-ordered JSON object.
pub type Record = Map<String, Value>;

/// Name of the required per-leaf metadata file.
pub const METADATA_FILE: &str = "metadata.md";

/// Content category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Top-level category, no parent
    Theme,

    /// Subdivision of a theme
    Topic,

    /// Leaf entity under a topic
    Exercise,

    /// Leaf entity under a topic
    Video,
}

/// Parent link for categories that get by-parent grouping files.
#[derive(Debug, Clone, Copy)]
pub struct ParentLink {
    /// Parent category whose mapping resolves the slug
    pub category: Category,

    /// Child record field holding the parent's slug
    pub field: &'static str,

    /// Grouping directory name under the child category's output dir
    pub dir: &'static str,
}

impl Category {
    /// All categories, in processing order (parents before children).
    pub const ALL: [Category; 4] = [
        Category::Theme,
        Category::Topic,
        Category::Exercise,
        Category::Video,
    ];

    /// Tag stored under `type` on every record.
    pub fn tag(self) -> &'static str {
        match self {
            Category::Theme => "theme",
            Category::Topic => "topic",
            Category::Exercise => "exercise",
            Category::Video => "video",
        }
    }

    /// Directory name under both `content/` and the output root.
    pub fn dir_name(self) -> &'static str {
        match self {
            Category::Theme => "themes",
            Category::Topic => "topics",
            Category::Exercise => "exercises",
            Category::Video => "videos",
        }
    }

    /// Record fields that receive the folder name at each nesting level,
    /// outermost first. The length is the category's nesting depth.
    pub fn folder_fields(self) -> &'static [&'static str] {
        match self {
            Category::Theme => &["folder"],
            Category::Topic => &["themeFolder", "topicFolder"],
            Category::Exercise => &["themeFolder", "topicFolder", "exerciseFolder"],
            Category::Video => &["themeFolder", "topicFolder", "videoFolder"],
        }
    }

    /// Auxiliary files loaded at each leaf, with the record field each one
    /// fills. Absent files fill the field with an empty string.
    pub fn aux_files(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Category::Theme => &[("description.md", "description")],
            Category::Topic => &[("content.md", "content")],
            Category::Exercise => &[
                ("instructions.md", "instructions"),
                ("solution.md", "solution"),
            ],
            Category::Video => &[("transcript.md", "transcript")],
        }
    }

    /// Display fields included in the category's index file.
    pub fn index_fields(self) -> &'static [&'static str] {
        match self {
            Category::Theme => &[
                "id",
                "title",
                "slug",
                "cardDescription",
                "category",
                "sequence",
                "image",
                "difficulty",
                "duration",
            ],
            Category::Topic => &[
                "id",
                "title",
                "slug",
                "cardDescription",
                "theme",
                "sequence",
                "difficulty",
                "duration",
            ],
            Category::Exercise => &[
                "id",
                "title",
                "slug",
                "cardDescription",
                "theme",
                "topic",
                "difficulty",
                "estimated_time",
                "points",
                "tags",
            ],
            Category::Video => &[
                "id",
                "title",
                "slug",
                "cardDescription",
                "theme",
                "topic",
                "duration",
                "video_url",
                "thumbnail",
                "difficulty",
                "tags",
            ],
        }
    }

    /// Parent link, for the categories that are grouped by a parent.
    pub fn parent(self) -> Option<ParentLink> {
        match self {
            Category::Theme => None,
            Category::Topic => Some(ParentLink {
                category: Category::Theme,
                field: "theme",
                dir: "by-theme",
            }),
            Category::Exercise | Category::Video => Some(ParentLink {
                category: Category::Topic,
                field: "topic",
                dir: "by-topic",
            }),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}
