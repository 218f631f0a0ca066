//! coursegen - static JSON API generator for markdown course content.
//!
//! Walks a `content/` tree of markdown files with frontmatter headers and
//! emits a denormalized JSON API for a front-end to consume at build time.
//!
//! # Output layout
//!
//! - `api/<category>/index.json` - summary listing per category
//! - `api/<category>/<id>.json` - full record per entity
//! - `api/topics/by-theme/<themeId>.json` and
//!   `api/{exercises,videos}/by-topic/<topicId>.json` - children grouped by
//!   their resolved parent
//!
//! # Modules
//!
//! - `frontmatter`: delimited-header parsing and rewriting
//! - `content`: category descriptors and the content tree walker
//! - `api`: JSON projection (indexes, entity files, groupings)
//! - `ids`: UUID assignment for metadata files
//! - `cli`: command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Stamp ids into new content
//! coursegen assign-ids
//!
//! # Build the JSON API
//! coursegen generate
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod content;
pub mod frontmatter;
pub mod ids;

// Re-export main types at crate root for convenience
pub use api::{ApiGenerator, GenerateSummary};
pub use content::{Category, ContentSet, Record};
pub use frontmatter::{Document, RawMatter};
pub use ids::{AssignSummary, IdAssigner};
