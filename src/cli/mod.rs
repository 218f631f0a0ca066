//! Command-line interface for coursegen.
//!
//! Provides commands for generating the JSON API from the content tree and
//! for stamping ids into metadata files.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::api::ApiGenerator;
use crate::config;
use crate::ids::IdAssigner;

/// coursegen - static JSON API generator for markdown course content
#[derive(Parser, Debug)]
#[command(name = "coursegen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the JSON API from the content tree
    Generate,

    /// Assign a UUID to every metadata.md that lacks one (rewrites files in
    /// place - commit your content tree first)
    AssignIds,

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Generate => generate_api().await,
            Commands::AssignIds => assign_ids().await,
            Commands::Config => show_config(),
        }
    }
}

/// Generate the JSON API
async fn generate_api() -> Result<()> {
    let content_dir = config::content_dir()?;
    let api_dir = config::api_dir()?;

    if !content_dir.exists() {
        anyhow::bail!("content directory not found: {}", content_dir.display());
    }

    eprintln!("🚀 Generating API from {}", content_dir.display());

    let generator = ApiGenerator::new(&content_dir, &api_dir);
    let summary = generator.generate().await?;

    println!("✨ API generated at {}", api_dir.display());
    println!("   - {} themes", summary.themes);
    println!("   - {} topics", summary.topics);
    println!("   - {} exercises", summary.exercises);
    println!("   - {} videos", summary.videos);

    Ok(())
}

/// Assign ids to metadata files missing one
async fn assign_ids() -> Result<()> {
    let content_dir = config::content_dir()?;

    if !content_dir.exists() {
        anyhow::bail!("content directory not found: {}", content_dir.display());
    }

    eprintln!("🔍 Scanning {} for metadata.md files", content_dir.display());

    let assigner = IdAssigner::new(&content_dir);
    let summary = assigner.run().await?;

    if summary.found == 0 {
        println!("No metadata.md files found");
        return Ok(());
    }

    println!(
        "✨ Done: {} of {} metadata files modified",
        summary.modified, summary.found
    );

    if summary.modified > 0 {
        println!("\nModified files need to be committed:");
        println!("   git add .");
        println!("   git commit -m \"chore: add ids to content metadata\"");
    }

    Ok(())
}

/// Show the resolved configuration (for debugging)
fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("coursegen configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Paths:");
    println!("  Content: {}", cfg.content.display());
    println!("  API:     {}", cfg.api.display());

    Ok(())
}
