//! CLI command implementations.

pub mod build;
pub mod convert;
pub mod dev;
pub mod export;
pub mod init;
pub mod serve;
