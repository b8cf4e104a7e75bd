//! Loading posts from a content directory.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use walkdir::WalkDir;

use crate::frontmatter::split_front_matter;
use crate::images::{inline_images, FsResolver};
use crate::post::{parse_date, Post};

/// Category assigned to posts that do not declare one.
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

/// Loads every Markdown file in a flat content directory.
#[derive(Debug, Clone)]
pub struct ContentLoader {
    content_dir: PathBuf,
    default_category: String,
    today: NaiveDate,
}

impl ContentLoader {
    /// Create a loader for `content_dir` using today's local date for
    /// posts without a usable date.
    pub fn new(content_dir: impl Into<PathBuf>) -> Self {
        Self {
            content_dir: content_dir.into(),
            default_category: DEFAULT_CATEGORY.to_string(),
            today: Local::now().date_naive(),
        }
    }

    /// Override the category given to posts without one.
    pub fn with_default_category(mut self, category: impl Into<String>) -> Self {
        self.default_category = category.into();
        self
    }

    /// Override the load date.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    /// Load all posts, newest first.
    ///
    /// A missing directory yields no posts. Files that cannot be read are
    /// skipped with a warning. Posts sharing a date keep file-name order.
    pub fn load(&self) -> Vec<Post> {
        if !self.content_dir.is_dir() {
            tracing::info!(
                "Content directory not found: {}",
                self.content_dir.display()
            );
            return Vec::new();
        }

        let mut posts = Vec::new();
        let mut seen_ids = HashSet::new();

        for entry in WalkDir::new(&self.content_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Failed to list content entry: {}", e);
                    continue;
                }
            };

            let path = entry.path();
            if !path.is_file() || !is_markdown(path) {
                continue;
            }

            if let Some(mut post) = self.load_file(path) {
                post.id = unique_id(post.id, &mut seen_ids);
                posts.push(post);
            }
        }

        posts.sort_by(|a, b| b.date.cmp(&a.date));

        tracing::debug!(
            "Loaded {} posts from {}",
            posts.len(),
            self.content_dir.display()
        );

        posts
    }

    /// Build a post from one Markdown file.
    fn load_file(&self, path: &Path) -> Option<Post> {
        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!("Skipping {}: {}", path.display(), e);
                return None;
            }
        };

        let filename = path.file_name()?.to_string_lossy().into_owned();
        let stem = path.file_stem()?.to_string_lossy().into_owned();

        let (front_matter, body) = split_front_matter(&source);

        let base_dir = path.parent().unwrap_or(&self.content_dir);
        let resolver = FsResolver::new(base_dir).with_root(&self.content_dir);
        let content = inline_images(body, &resolver).trim().to_string();

        let date = match front_matter.date.as_deref() {
            Some(raw) => parse_date(raw).unwrap_or_else(|| {
                tracing::warn!(
                    "Unrecognized date {:?} in {}, using {}",
                    raw,
                    filename,
                    self.today
                );
                self.today
            }),
            None => self.today,
        };

        Some(Post {
            id: non_empty(front_matter.id).unwrap_or_else(|| stem.clone()),
            title: non_empty(front_matter.title).unwrap_or(stem),
            date,
            category: non_empty(front_matter.category)
                .unwrap_or_else(|| self.default_category.clone()),
            subcategory: non_empty(front_matter.subcategory),
            content,
            filename,
        })
    }
}

/// Load posts from `dir` with default settings.
pub fn load_posts(dir: impl Into<PathBuf>) -> Vec<Post> {
    ContentLoader::new(dir).load()
}

/// Render posts as the `blogPosts` data module consumed by the viewer.
pub fn posts_module(posts: &[Post]) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string_pretty(posts)?;
    Ok(format!("export const blogPosts = {};", json))
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("markdown"))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Suffix `-2`, `-3`, ... onto ids already taken.
fn unique_id(id: String, seen: &mut HashSet<String>) -> String {
    if seen.insert(id.clone()) {
        return id;
    }

    let mut n = 2;
    loop {
        let candidate = format!("{}-{}", id, n);
        if seen.insert(candidate.clone()) {
            tracing::warn!("Duplicate post id {:?}, using {:?}", id, candidate);
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn loader(dir: &Path) -> ContentLoader {
        ContentLoader::new(dir).with_today(day(2025, 6, 1))
    }

    #[test]
    fn loads_and_orders_newest_first() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join("a.md"),
            "---\ntitle: \"Alpha\"\ndate: 2024-01-02\ncategory: \"Tech\"\n---\nHello\n",
        )
        .unwrap();
        fs::write(
            temp.path().join("b.md"),
            "---\ntitle: \"Beta\"\ndate: 2024-01-05\ncategory: \"Tech\"\nsubcategory: \"Notes\"\n---\nWorld\n",
        )
        .unwrap();

        let posts = loader(temp.path()).load();

        let titles: Vec<_> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Beta", "Alpha"]);
        assert_eq!(posts[0].subcategory.as_deref(), Some("Notes"));
        assert_eq!(posts[1].content, "Hello");
        assert_eq!(posts[1].filename, "a.md");
        assert_eq!(posts[1].id, "a");
    }

    #[test]
    fn missing_directory_is_empty() {
        let temp = tempdir().unwrap();

        let posts = load_posts(temp.path().join("nope"));

        assert!(posts.is_empty());
    }

    #[test]
    fn applies_defaults() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("plain-note.md"), "\n\n# Just text\n\n").unwrap();

        let posts = loader(temp.path())
            .with_default_category("Misc")
            .load();

        assert_eq!(posts.len(), 1);
        let post = &posts[0];
        assert_eq!(post.id, "plain-note");
        assert_eq!(post.title, "plain-note");
        assert_eq!(post.date, day(2025, 6, 1));
        assert_eq!(post.category, "Misc");
        assert_eq!(post.subcategory, None);
        assert_eq!(post.content, "# Just text");
    }

    #[test]
    fn uses_declared_id_and_ignores_blank_fields() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join("x.md"),
            "---\nid: custom\ntitle: \"\"\nsubcategory: \"\"\n---\nBody",
        )
        .unwrap();

        let posts = loader(temp.path()).load();

        assert_eq!(posts[0].id, "custom");
        assert_eq!(posts[0].title, "x");
        assert_eq!(posts[0].category, DEFAULT_CATEGORY);
        assert_eq!(posts[0].subcategory, None);
    }

    #[test]
    fn ignores_non_markdown_files_and_subdirectories() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("notes.txt"), "text").unwrap();
        fs::write(temp.path().join("long.markdown"), "long").unwrap();
        fs::create_dir_all(temp.path().join("nested")).unwrap();
        fs::write(temp.path().join("nested/inner.md"), "inner").unwrap();

        let posts = loader(temp.path()).load();

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].filename, "long.markdown");
    }

    #[test]
    fn equal_dates_keep_listing_order() {
        let temp = tempdir().unwrap();
        for name in ["c.md", "a.md", "b.md"] {
            fs::write(temp.path().join(name), "---\ndate: 2024-02-02\n---\nx").unwrap();
        }
        fs::write(temp.path().join("z.md"), "---\ndate: 2024-03-01\n---\nx").unwrap();

        let posts = loader(temp.path()).load();

        let ids: Vec<_> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["z", "a", "b", "c"]);
    }

    #[test]
    fn loading_twice_is_identical() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("one.md"), "---\ntitle: One\n---\nA").unwrap();
        fs::write(temp.path().join("two.md"), "---\ntitle: Two\n---\nB").unwrap();

        let loader = loader(temp.path());

        assert_eq!(loader.load(), loader.load());
    }

    #[test]
    fn rejected_dates_fall_back_to_load_date() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("odd.md"), "---\ndate: March 3rd\n---\nx").unwrap();

        let posts = loader(temp.path()).load();

        assert_eq!(posts[0].date, day(2025, 6, 1));
    }

    #[test]
    fn duplicate_ids_are_suffixed() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("a.md"), "---\nid: same\n---\nx").unwrap();
        fs::write(temp.path().join("b.md"), "---\nid: same\n---\ny").unwrap();
        fs::write(temp.path().join("c.md"), "---\nid: same\n---\nz").unwrap();

        let posts = loader(temp.path()).load();

        let ids: Vec<_> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["same", "same-2", "same-3"]);
    }

    #[test]
    fn skips_unreadable_files() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("bad.md"), [0xffu8, 0xfe, 0x00]).unwrap();
        fs::write(temp.path().join("good.md"), "fine").unwrap();

        let posts = loader(temp.path()).load();

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, "good");
    }

    #[test]
    fn inlines_images_next_to_posts() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("pic.png"), [1u8, 2, 3]).unwrap();
        fs::write(
            temp.path().join("p.md"),
            "![pic](pic.png) ![web](https://example.com/w.png) ![gone](gone.png)",
        )
        .unwrap();

        let posts = loader(temp.path()).load();

        assert_eq!(
            posts[0].content,
            "![pic](data:image/png;base64,AQID) ![web](https://example.com/w.png) ![gone](gone.png)"
        );
    }

    #[test]
    fn front_matter_delimiters_do_not_leak() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("p.md"), "---\ntitle: [broken\n---\nBody").unwrap();

        let posts = loader(temp.path()).load();

        assert_eq!(posts[0].content, "Body");
        assert_eq!(posts[0].title, "p");
    }

    #[test]
    fn renders_posts_module() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join("a.md"),
            "---\ntitle: Alpha\ndate: 2024-01-02\n---\nHello",
        )
        .unwrap();

        let posts = loader(temp.path()).load();
        let module = posts_module(&posts).unwrap();

        assert!(module.starts_with("export const blogPosts = ["));
        assert!(module.ends_with("];"));
        assert!(module.contains("\"title\": \"Alpha\""));
        assert!(module.contains("\"date\": \"2024-01-02\""));
    }
}
