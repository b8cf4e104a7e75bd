//! Inlining of local Markdown image references as data URIs.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use base64::prelude::{Engine, BASE64_STANDARD};
use regex::{Captures, Regex};

/// `![alt](src)` or `![alt](src "title")`.
static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"!\[([^\]]*?)\]\s*\(([^)\s]+?)(?:\s+"([^"]*)")?\)"#)
        .expect("Invalid image regex")
});

/// Resolves a local image reference to its embedded form.
pub trait ImageResolver {
    /// Return the data URI for `src`, or `None` to leave the reference as is.
    fn resolve(&self, src: &str) -> Option<String>;
}

impl<F> ImageResolver for F
where
    F: Fn(&str) -> Option<String>,
{
    fn resolve(&self, src: &str) -> Option<String> {
        self(src)
    }
}

/// Replace every resolvable local image reference in `markdown`.
///
/// Remote references (`http://`, `https://`, `//`) and existing `data:` URIs
/// are never touched. References the resolver cannot handle are kept
/// verbatim and reported as a warning.
pub fn inline_images<R>(markdown: &str, resolver: &R) -> String
where
    R: ImageResolver + ?Sized,
{
    IMAGE_RE
        .replace_all(markdown, |caps: &Captures| {
            let original = &caps[0];
            let alt = &caps[1];
            let src = &caps[2];

            if is_remote(src) || src.starts_with("data:") {
                return original.to_string();
            }

            match resolver.resolve(src) {
                Some(uri) => match caps.get(3) {
                    Some(title) => format!("![{}]({} \"{}\")", alt, uri, title.as_str()),
                    None => format!("![{}]({})", alt, uri),
                },
                None => {
                    tracing::warn!("Image not found: {}", src);
                    original.to_string()
                }
            }
        })
        .into_owned()
}

fn is_remote(src: &str) -> bool {
    src.starts_with("http://") || src.starts_with("https://") || src.starts_with("//")
}

/// Final path segment of an image reference.
fn basename(src: &str) -> &str {
    src.rsplit(['/', '\\']).next().unwrap_or(src)
}

/// MIME type for the image extensions that can be embedded.
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();

    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "svg" => Some("image/svg+xml"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Encode bytes as a base64 data URI.
pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, BASE64_STANDARD.encode(bytes))
}

/// Resolves references against files on disk.
///
/// Relative references resolve against the directory of the Markdown file;
/// references starting with `/` resolve against the content root.
#[derive(Debug, Clone)]
pub struct FsResolver {
    base_dir: PathBuf,
    root_dir: PathBuf,
}

impl FsResolver {
    /// Resolver for a file in `base_dir`, with `base_dir` as the content root.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        Self {
            root_dir: base_dir.clone(),
            base_dir,
        }
    }

    /// Use a different root for `/`-prefixed references.
    pub fn with_root(mut self, root_dir: impl Into<PathBuf>) -> Self {
        self.root_dir = root_dir.into();
        self
    }

    fn locate(&self, src: &str) -> PathBuf {
        match src.strip_prefix('/') {
            Some(rooted) => self.root_dir.join(rooted),
            None => self.base_dir.join(src),
        }
    }
}

impl ImageResolver for FsResolver {
    fn resolve(&self, src: &str) -> Option<String> {
        let path = self.locate(src);
        let mime = mime_for_path(&path)?;

        match fs::read(&path) {
            Ok(bytes) => Some(data_uri(mime, &bytes)),
            Err(e) => {
                tracing::debug!("Failed to read image {}: {}", path.display(), e);
                None
            }
        }
    }
}

/// In-memory table from image file name to data URI.
///
/// Entries keep insertion order; inserting an existing name replaces its
/// value in place.
#[derive(Debug, Clone, Default)]
pub struct ImageTable {
    entries: Vec<(String, String)>,
}

impl ImageTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an image.
    pub fn insert(&mut self, name: impl Into<String>, data_uri: impl Into<String>) {
        let name = name.into();
        let data_uri = data_uri.into();

        if name.is_empty() {
            return;
        }

        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = data_uri,
            None => self.entries.push((name, data_uri)),
        }
    }

    /// Read an image file and add it under its file name.
    ///
    /// Returns the name the image was stored under.
    pub fn insert_file(&mut self, path: &Path) -> Result<String, ImageError> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ImageError::InvalidName(path.display().to_string()))?
            .to_string();

        let mime = mime_for_path(path)
            .ok_or_else(|| ImageError::UnsupportedType(path.display().to_string()))?;

        let bytes = fs::read(path).map_err(|source| ImageError::Read {
            path: path.display().to_string(),
            source,
        })?;

        self.insert(name.clone(), data_uri(mime, &bytes));
        Ok(name)
    }

    /// Remove an image, returning its data URI.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self.entries.iter().position(|(key, _)| key == name)?;
        Some(self.entries.remove(index).1)
    }

    /// Data URI stored under exactly `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, uri)| uri.as_str())
    }

    /// Image names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the data URI for an image reference.
    ///
    /// The reference's basename is matched exactly first. Failing that, any
    /// key that contains the reference or is contained in it matches; the
    /// longest such key wins, and equal lengths go to the lexicographically
    /// smallest key.
    pub fn lookup(&self, src: &str) -> Option<&str> {
        if let Some(uri) = self.get(basename(src)) {
            return Some(uri);
        }

        self.entries
            .iter()
            .filter(|(key, _)| src.contains(key.as_str()) || key.contains(src))
            .max_by(|(a, _), (b, _)| a.len().cmp(&b.len()).then_with(|| b.cmp(a)))
            .map(|(_, uri)| uri.as_str())
    }
}

impl ImageResolver for ImageTable {
    fn resolve(&self, src: &str) -> Option<String> {
        self.lookup(src).map(str::to_string)
    }
}

/// Errors that can occur when adding an image file to a table.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("Not an image file name: {0}")]
    InvalidName(String),

    #[error("Unsupported image type: {0}")]
    UnsupportedType(String),

    #[error("Failed to read image {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
