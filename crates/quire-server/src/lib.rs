//! Development server with live reload for quire content.
//!
//! Every request loads the content directory afresh, so the served viewer,
//! data module and export always reflect the files on disk. A file watcher
//! tells connected browsers to reload when content changes.

pub mod server;
pub mod watcher;
pub mod websocket;

pub use server::{DevServer, DevServerConfig, ServerError};
pub use watcher::{FileWatcher, WatchEvent};
pub use websocket::{HmrHub, HmrMessage};
