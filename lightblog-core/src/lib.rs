//! # lightblog-core
//!
//! Core library for lightblog, a database-free blog engine.
//!
//! A directory of plain-text articles (YAML metadata block, blank line,
//! Markdown body) becomes an in-memory, sorted, tag-indexed [`Collection`].
//! The [`ArticleStore`] keeps that collection in step with the filesystem:
//! every refresh is a full rebuild, swapped in atomically.

pub mod builder;
pub mod collection;
pub mod config;
pub mod frontmatter;
pub mod markdown;
pub mod models;
pub mod parser;
pub mod render;
pub mod slug;
pub mod store;
pub mod template;
pub mod version;

pub use builder::CollectionBuilder;
pub use collection::{Collection, SkippedArticle};
pub use config::{Config, ConfigError};
pub use models::{Article, ArticleHeader};
pub use parser::{ArticleError, ArticleParser};
pub use render::ContentRenderer;
pub use store::{ArticleStore, RefreshTrigger};
pub use version::{VersionMarker, VersionStamp};
