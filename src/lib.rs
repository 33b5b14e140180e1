//! Archive Files - resolution of file inclusion rules
//!
//! This crate turns a list of declarative file rules (source pattern,
//! destination, ownership/mode/mtime metadata) into the flat list of files an
//! archive writer needs, with destinations computed and templates applied.
//! It reads directory listings only; file contents are never touched.

pub mod error;
pub mod fs;
pub mod resolver;
pub mod template;
pub mod types;

pub use error::ResolveError;
pub use fs::{FileSystem, MemoryFileSystem, OsFileSystem};
pub use resolver::{resolve, ResolveOptions, Resolver};
pub use template::{Substitute, TemplateContext, TemplateError, TemplateProcessor};
pub use types::*;
