//! Static build command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use quire_static::StaticBuilder;

use crate::config::Config;

/// Run the build command.
pub async fn run(config: &Config, output: Option<PathBuf>, minify: Option<bool>) -> Result<()> {
    tracing::info!("Building viewer and export...");

    let mut build = config.build_config();
    if let Some(output) = output {
        build.output_dir = output;
    }
    if let Some(minify) = minify {
        build.minify = minify;
    }

    let result = StaticBuilder::new(build).build().context("Build failed")?;

    tracing::info!(
        "Built {} posts in {} categories in {}ms",
        result.posts,
        result.categories,
        result.duration_ms
    );

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
