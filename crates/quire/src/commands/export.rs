//! Printable export command.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use quire_content::render_markdown;
use quire_static::{export_filename, generate_export, StaticBuilder};

use crate::config::Config;

/// Run the export command.
pub async fn run(
    config: &Config,
    title: Option<String>,
    subtitle: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    let path = write_export(config, title, subtitle, output)?;

    tracing::info!("Wrote {}", path.display());

    Ok(())
}

/// Load the posts and write the export document. Returns the written path.
fn write_export(
    config: &Config,
    title: Option<String>,
    subtitle: Option<String>,
    output: Option<PathBuf>,
) -> Result<PathBuf> {
    let mut build = config.build_config();
    if let Some(title) = title {
        build.export_title = title;
    }
    if subtitle.is_some() {
        build.export_subtitle = subtitle;
    }

    let builder = StaticBuilder::new(build);
    let posts = builder.load_posts();
    tracing::info!("Exporting {} posts", posts.len());

    let options = builder
        .config()
        .export_options(posts.len(), Local::now().date_naive());
    let html = generate_export(&options, &posts, render_markdown)?;

    let path = output.unwrap_or_else(|| PathBuf::from(export_filename(&options.title)));
    fs::write(&path, html).with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_export_with_overrides() {
        let temp = tempdir().unwrap();
        let content = temp.path().join("content");
        fs::create_dir_all(&content).unwrap();
        fs::write(content.join("one.md"), "---\ntitle: \"One\"\n---\nFirst").unwrap();

        let mut config = Config::default();
        config.content.dir = content;
        let output = temp.path().join("out.html");

        let path = write_export(
            &config,
            Some("Reading List".to_string()),
            Some("Selected".to_string()),
            Some(output.clone()),
        )
        .unwrap();

        assert_eq!(path, output);
        let html = fs::read_to_string(&output).unwrap();
        assert!(html.contains("<title>Reading List</title>"));
        assert!(html.contains("Selected"));
        assert!(html.contains("<p>First</p>"));
    }
}
