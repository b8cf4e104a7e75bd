//! Project configuration (`quire.toml`).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use quire_content::DEFAULT_CATEGORY;
use quire_static::{BuildConfig, ThemeMode, ThemeSettings};
use serde::Deserialize;

/// Configuration file structure. Every section and key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub content: ContentSection,
    pub site: SiteSection,
    pub build: BuildSection,
    pub export: ExportSection,
    pub server: ServerSection,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ContentSection {
    /// Directory holding the Markdown posts
    pub dir: PathBuf,
    /// Category for posts that declare none
    pub default_category: String,
}

impl Default for ContentSection {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("content"),
            default_category: DEFAULT_CATEGORY.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    pub title: String,
    pub subtitle: String,
    pub footer: String,
    pub theme: ThemeMode,
}

impl Default for SiteSection {
    fn default() -> Self {
        let build = BuildConfig::default();
        Self {
            title: build.title,
            subtitle: build.subtitle,
            footer: build.footer,
            theme: ThemeMode::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BuildSection {
    pub output: PathBuf,
    pub minify: bool,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            output: PathBuf::from("dist"),
            minify: true,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ExportSection {
    pub title: String,
    /// Defaults to the post count when unset
    pub subtitle: Option<String>,
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            title: BuildConfig::default().export_title,
            subtitle: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self { port: 7777 }
    }
}

impl Config {
    /// Load configuration from `path` if it exists.
    /// Returns an error if the file exists but is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No {} found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config =
            toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;

        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Build settings described by this configuration.
    pub fn build_config(&self) -> BuildConfig {
        BuildConfig {
            content_dir: self.content.dir.clone(),
            output_dir: self.build.output.clone(),
            minify: self.build.minify,
            title: self.site.title.clone(),
            subtitle: self.site.subtitle.clone(),
            footer: self.site.footer.clone(),
            default_category: self.content.default_category.clone(),
            theme: ThemeSettings::new(self.site.theme),
            export_title: self.export.title.clone(),
            export_subtitle: self.export.subtitle.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn missing_file_uses_defaults() {
        let temp = tempdir().unwrap();

        let config = Config::load(&temp.path().join("quire.toml")).unwrap();

        assert_eq!(config.content.dir, PathBuf::from("content"));
        assert_eq!(config.content.default_category, "Uncategorized");
        assert_eq!(config.build.output, PathBuf::from("dist"));
        assert!(config.build.minify);
        assert_eq!(config.server.port, 7777);
        assert_eq!(config.export.subtitle, None);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("quire.toml");
        fs::write(
            &path,
            "[site]\ntitle = \"Field Notes\"\ntheme = \"dark\"\n\n[export]\nsubtitle = \"All of it\"\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        let build = config.build_config();

        assert_eq!(build.title, "Field Notes");
        assert_eq!(build.theme.mode, ThemeMode::Dark);
        assert_eq!(build.export_subtitle.as_deref(), Some("All of it"));
        assert_eq!(build.content_dir, PathBuf::from("content"));
        assert_eq!(build.export_title, "Collected Posts");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("quire.toml");
        fs::write(&path, "[build]\nminify = \"sometimes\"\n").unwrap();

        assert!(Config::load(&path).is_err());
    }
}
