//! Static site builder.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use chrono::{Local, NaiveDate};
use quire_content::{
    excerpt, posts_module, render_markdown, ContentLoader, NavigationTree, Post, DEFAULT_CATEGORY,
};

use crate::assets::AssetPipeline;
use crate::export::{generate_export_with, unique_anchors, ExportOptions};
use crate::templates::{NavCategory, NavGroup, NavLink, TemplateEngine, ViewerContext, ViewerPost};
use crate::theme::ThemeSettings;

/// Characters kept in post list excerpts.
const EXCERPT_CHARS: usize = 100;

/// Configuration for building the static output.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Source content directory
    pub content_dir: PathBuf,

    /// Output directory
    pub output_dir: PathBuf,

    /// Minify embedded CSS
    pub minify: bool,

    /// Viewer title
    pub title: String,

    /// Viewer subtitle
    pub subtitle: String,

    /// Viewer footer text
    pub footer: String,

    /// Category for posts that declare none
    pub default_category: String,

    /// Initial theme of the viewer
    pub theme: ThemeSettings,

    /// Title of the printable export
    pub export_title: String,

    /// Subtitle of the printable export; defaults to a post count
    pub export_subtitle: Option<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content"),
            output_dir: PathBuf::from("dist"),
            minify: true,
            title: "My Blog".to_string(),
            subtitle: String::new(),
            footer: "Built with quire".to_string(),
            default_category: DEFAULT_CATEGORY.to_string(),
            theme: ThemeSettings::default(),
            export_title: "Collected Posts".to_string(),
            export_subtitle: None,
        }
    }
}

impl BuildConfig {
    /// Export settings for `post_count` posts, stamped with `today`.
    pub fn export_options(&self, post_count: usize, today: NaiveDate) -> ExportOptions {
        let subtitle = self
            .export_subtitle
            .clone()
            .unwrap_or_else(|| format!("{} posts · newest first", post_count));

        ExportOptions::new(self.export_title.clone(), subtitle)
            .with_generated_on(today)
            .with_minify(self.minify)
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of posts loaded
    pub posts: usize,

    /// Number of navigation categories
    pub categories: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to serialize posts: {0}")]
    SerializeError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// Static site builder.
pub struct StaticBuilder {
    config: BuildConfig,
    templates: TemplateEngine,
}

impl StaticBuilder {
    /// Create a new static builder.
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config,
            templates: TemplateEngine::new(),
        }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Load posts from the configured content directory.
    pub fn load_posts(&self) -> Vec<Post> {
        ContentLoader::new(&self.config.content_dir)
            .with_default_category(self.config.default_category.clone())
            .load()
    }

    /// Build the viewer page, the data module and the printable export.
    pub fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let posts = self.load_posts();
        let categories = NavigationTree::build(&posts).categories.len();

        let viewer = self.render_viewer(&posts)?;
        self.write("index.html", &viewer)?;

        let module = self.render_module(&posts)?;
        self.write("posts.js", &module)?;

        let export = self.render_export(&posts, Local::now().date_naive())?;
        self.write("print.html", &export)?;

        let duration = start.elapsed();

        Ok(BuildResult {
            posts: posts.len(),
            categories,
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Render the single-page viewer for `posts`.
    pub fn render_viewer(&self, posts: &[Post]) -> Result<String, BuildError> {
        // Keyed by address: the navigation tree borrows from `posts`, and
        // posts passed in by callers may share an id.
        let anchors: HashMap<*const Post, String> = posts
            .iter()
            .map(|post| post as *const Post)
            .zip(unique_anchors(posts, "post"))
            .collect();

        let link = |post: &Post| NavLink {
            anchor: anchors[&(post as *const Post)].clone(),
            title: post.title.clone(),
        };

        let tree = NavigationTree::build(posts);
        let nav = tree
            .categories
            .iter()
            .map(|category| NavCategory {
                name: category.name.clone(),
                posts: category.posts.iter().map(|&p| link(p)).collect(),
                subcategories: category
                    .subcategories
                    .iter()
                    .map(|sub| NavGroup {
                        name: sub.name.clone(),
                        posts: sub.posts.iter().map(|&p| link(p)).collect(),
                    })
                    .collect(),
            })
            .collect();

        let posts = posts
            .iter()
            .map(|post| ViewerPost {
                anchor: anchors[&(post as *const Post)].clone(),
                title: post.title.clone(),
                date: post.date_string(),
                category: post.category.clone(),
                subcategory: post.subcategory.clone(),
                excerpt: excerpt(&post.content, EXCERPT_CHARS),
                html: render_markdown(&post.content),
            })
            .collect();

        let context = ViewerContext {
            title: self.config.title.clone(),
            subtitle: self.config.subtitle.clone(),
            footer: self.config.footer.clone(),
            theme: self.config.theme.clone(),
            css: AssetPipeline::viewer_css(self.config.minify),
            js: AssetPipeline::viewer_js(),
            nav,
            posts,
        };

        self.templates
            .render_viewer(&context)
            .map_err(|e| BuildError::TemplateError(e.to_string()))
    }

    /// Render the `blogPosts` data module.
    pub fn render_module(&self, posts: &[Post]) -> Result<String, BuildError> {
        posts_module(posts).map_err(|e| BuildError::SerializeError(e.to_string()))
    }

    /// Render the printable export stamped with `today`.
    pub fn render_export(&self, posts: &[Post], today: NaiveDate) -> Result<String, BuildError> {
        let options = self.config.export_options(posts.len(), today);

        generate_export_with(&self.templates, &options, posts, render_markdown)
            .map_err(|e| BuildError::TemplateError(e.to_string()))
    }

    fn write(&self, name: &str, contents: &str) -> Result<(), BuildError> {
        let path = self.config.output_dir.join(name);
        tracing::debug!("Writing {}", path.display());
        fs::write(&path, contents)
            .map_err(|e| BuildError::WriteError(format!("{}: {}", path.display(), e)))
    }
}
