//! Printable single-document export of a post collection.

use std::collections::HashSet;

use chrono::{Local, NaiveDate};
use quire_content::Post;

use crate::assets::AssetPipeline;
use crate::templates::{ExportContext, ExportEntry, TemplateEngine};

/// Settings for one export document.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Banner title, also used for the file name
    pub title: String,

    /// Banner subtitle
    pub subtitle: String,

    /// Date stamped in the footer
    pub generated_on: NaiveDate,

    /// Minify the embedded stylesheet
    pub minify: bool,
}

impl ExportOptions {
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            generated_on: Local::now().date_naive(),
            minify: false,
        }
    }

    pub fn with_generated_on(mut self, date: NaiveDate) -> Self {
        self.generated_on = date;
        self
    }

    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }
}

/// Errors that can occur while generating an export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Failed to render export template: {0}")]
    TemplateError(String),
}

/// Generate the printable export document.
///
/// `render` turns a post body into HTML; callers may inline images before
/// rendering. Sections follow the order of `posts`.
pub fn generate_export<F>(options: &ExportOptions, posts: &[Post], render: F) -> Result<String, ExportError>
where
    F: Fn(&str) -> String,
{
    generate_export_with(&TemplateEngine::new(), options, posts, render)
}

/// Like [`generate_export`], reusing an existing template engine.
pub fn generate_export_with<F>(
    templates: &TemplateEngine,
    options: &ExportOptions,
    posts: &[Post],
    render: F,
) -> Result<String, ExportError>
where
    F: Fn(&str) -> String,
{
    let anchors = anchor_ids(posts);
    let total = posts.len();

    let entries = posts
        .iter()
        .zip(anchors)
        .enumerate()
        .map(|(index, (post, anchor))| ExportEntry {
            anchor,
            position: index + 1,
            title: post.title.clone(),
            date: post.date_string(),
            category: post.category.clone(),
            subcategory: post.subcategory.clone(),
            filename: Some(post.filename.clone()).filter(|f| !f.is_empty()),
            html: render(&post.content),
            last: index + 1 == total,
        })
        .collect();

    let context = ExportContext {
        title: options.title.clone(),
        subtitle: options.subtitle.clone(),
        generated_on: options.generated_on.format("%Y-%m-%d").to_string(),
        css: AssetPipeline::export_css(options.minify),
        js: AssetPipeline::export_js(),
        total,
        entries,
    };

    templates
        .render_export(&context)
        .map_err(|e| ExportError::TemplateError(e.to_string()))
}

/// Section anchors for `posts`, one per post, all distinct.
///
/// Each anchor is `article-` followed by the post id with whitespace runs
/// replaced by `-`, or by the post's position when the id is blank. An
/// anchor already taken gets `-{position}` appended.
pub fn anchor_ids(posts: &[Post]) -> Vec<String> {
    unique_anchors(posts, "article")
}

/// Distinct element ids `{prefix}-{id}` for `posts`, de-collided as
/// [`anchor_ids`] does.
pub fn unique_anchors(posts: &[Post], prefix: &str) -> Vec<String> {
    let mut seen = HashSet::new();

    posts
        .iter()
        .enumerate()
        .map(|(index, post)| {
            let key = if post.id.trim().is_empty() {
                index.to_string()
            } else {
                post.id.split_whitespace().collect::<Vec<_>>().join("-")
            };

            let mut anchor = format!("{}-{}", prefix, key);
            if !seen.contains(&anchor) {
                seen.insert(anchor.clone());
                return anchor;
            }

            anchor = format!("{}-{}", anchor, index);
            while !seen.insert(anchor.clone()) {
                anchor.push('_');
            }
            anchor
        })
        .collect()
}

/// File name for an export titled `title`.
pub fn export_filename(title: &str) -> String {
    let slug = slugify(title);
    if slug.is_empty() {
        "export.html".to_string()
    } else {
        format!("{}.html", slug)
    }
}

/// Convert a title to a file-name-safe slug.
fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|c| *c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
