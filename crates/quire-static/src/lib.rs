//! Static output for quire.
//!
//! Builds the single-page post viewer, the printable export document and
//! standalone conversions of loose Markdown files.

pub mod assets;
pub mod builder;
pub mod convert;
pub mod export;
pub mod templates;
pub mod theme;

pub use builder::{BuildConfig, BuildError, BuildResult, StaticBuilder};
pub use convert::{AddedFile, ConvertError, Converter, DocumentId, MarkdownDocument};
pub use export::{
    anchor_ids, export_filename, generate_export, unique_anchors, ExportError, ExportOptions,
};
pub use theme::{ThemeMode, ThemeSettings};
