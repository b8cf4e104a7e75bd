//! Content pipeline for quire.
//!
//! This crate loads a flat directory of Markdown posts, parses their YAML
//! front matter, inlines local images as data URIs, groups the posts into a
//! category/subcategory navigation tree and renders Markdown to HTML.

pub mod frontmatter;
pub mod images;
pub mod loader;
pub mod navigation;
pub mod post;
pub mod render;

pub use frontmatter::{extract_front_matter, split_front_matter, FrontMatter, FrontMatterError};
pub use images::{data_uri, inline_images, mime_for_path, FsResolver, ImageResolver, ImageTable};
pub use loader::{load_posts, posts_module, ContentLoader, DEFAULT_CATEGORY};
pub use navigation::{CategoryNode, NavigationTree, SubcategoryNode};
pub use post::{parse_date, Post};
pub use render::{excerpt, render_markdown};
