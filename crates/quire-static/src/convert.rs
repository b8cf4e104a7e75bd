//! Standalone conversion of loose Markdown files and images to one HTML page.

use std::fs;
use std::path::Path;

use quire_content::images::ImageError;
use quire_content::{inline_images, mime_for_path, render_markdown, ImageTable};

use crate::assets::AssetPipeline;
use crate::templates::{ConvertedContext, TemplateEngine};

/// Separator placed between combined documents.
const DOCUMENT_SEPARATOR: &str = "\n\n---\n\n";

/// Identifier of a Markdown document added to a [`Converter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(u64);

/// A Markdown document held by a [`Converter`].
#[derive(Debug, Clone)]
pub struct MarkdownDocument {
    pub id: DocumentId,
    pub name: String,
    pub content: String,
}

/// What [`Converter::add_file`] did with a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddedFile {
    Markdown(DocumentId),
    Image(String),
}

/// Errors that can occur while converting.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Unsupported file type: {0}")]
    Unsupported(String),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error("Failed to render converted document: {0}")]
    TemplateError(String),
}

/// Collects Markdown documents and images, then renders them as one page.
///
/// Documents are combined in file-name order. Images are matched against
/// references in the Markdown by file name.
#[derive(Debug, Default)]
pub struct Converter {
    documents: Vec<MarkdownDocument>,
    images: ImageTable,
    next_id: u64,
}

impl Converter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a Markdown document.
    pub fn add_markdown(&mut self, name: impl Into<String>, content: impl Into<String>) -> DocumentId {
        let id = DocumentId(self.next_id);
        self.next_id += 1;

        self.documents.push(MarkdownDocument {
            id,
            name: name.into(),
            content: content.into(),
        });

        id
    }

    /// Remove a document. Returns false when it was not present.
    pub fn remove_markdown(&mut self, id: DocumentId) -> bool {
        let before = self.documents.len();
        self.documents.retain(|doc| doc.id != id);
        self.documents.len() != before
    }

    /// Add or replace an image by file name.
    pub fn add_image(&mut self, name: impl Into<String>, data_uri: impl Into<String>) {
        self.images.insert(name, data_uri);
    }

    pub fn remove_image(&mut self, name: &str) -> Option<String> {
        self.images.remove(name)
    }

    pub fn documents(&self) -> &[MarkdownDocument] {
        &self.documents
    }

    pub fn images(&self) -> &ImageTable {
        &self.images
    }

    /// Add a file from disk, classified as an image by its MIME type or as
    /// Markdown by its extension.
    pub fn add_file(&mut self, path: &Path) -> Result<AddedFile, ConvertError> {
        if mime_for_path(path).is_some_and(|mime| mime.starts_with("image/")) {
            let name = self.images.insert_file(path)?;
            return Ok(AddedFile::Image(name));
        }

        if !is_markdown(path) {
            return Err(ConvertError::Unsupported(path.display().to_string()));
        }

        let content = fs::read_to_string(path).map_err(|source| ConvertError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(AddedFile::Markdown(self.add_markdown(name, content)))
    }

    /// All documents as one Markdown text.
    ///
    /// Documents are sorted by name. Each gets a `# title` heading derived
    /// from its file name, except a first document that already opens with
    /// a heading.
    pub fn combined_markdown(&self) -> String {
        let mut sorted: Vec<&MarkdownDocument> = self.documents.iter().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));

        sorted
            .iter()
            .enumerate()
            .map(|(index, doc)| {
                if index > 0 || !doc.content.trim().starts_with('#') {
                    format!("# {}\n\n{}", heading_for(&doc.name), doc.content)
                } else {
                    doc.content.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(DOCUMENT_SEPARATOR)
    }

    /// Rendered HTML body with images inlined.
    pub fn render_body(&self) -> String {
        if self.documents.is_empty() {
            return String::new();
        }

        let markdown = inline_images(&self.combined_markdown(), &self.images);
        render_markdown(&markdown)
    }

    /// Complete standalone HTML document.
    pub fn render_html(&self, title: &str) -> Result<String, ConvertError> {
        let context = ConvertedContext {
            title: title.to_string(),
            css: AssetPipeline::converted_css(false),
            content: self.render_body(),
        };

        TemplateEngine::new()
            .render_converted(&context)
            .map_err(|e| ConvertError::TemplateError(e.to_string()))
    }
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("markdown"))
}

/// `getting_started-guide.md` -> `getting started guide`.
fn heading_for(name: &str) -> String {
    let stem = name
        .strip_suffix(".md")
        .or_else(|| name.strip_suffix(".markdown"))
        .unwrap_or(name);

    stem.replace(['-', '_'], " ")
}
