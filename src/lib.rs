//! # Comprehender
//!
//! Structural analysis and documentation for Java projects.
//!
//! Comprehender reads a source tree in two passes. The first builds a
//! project-wide index of every declared type name. The second extracts, per
//! file, each top-level type with its span, members and the project types it
//! depends on. From that it derives `extends` / `implements` / `uses`
//! relations, renders a PlantUML class diagram and writes commented copies of
//! the sources.
//!
//! ## Key Features
//!
//! - **Typed syntax tree**: tree-sitter output is lowered into a small closed
//!   node enumeration carrying start lines only
//! - **Span reconstruction**: end lines are recovered from the deepest
//!   positioned descendant
//! - **Isolated failures**: a file that does not parse is logged and skipped
//! - **Pluggable descriptions**: comments come from any [`Describer`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use comprehender::{ComprehendConfig, Pipeline, Placeholder};
//! use std::path::Path;
//!
//! let pipeline = Pipeline::new(ComprehendConfig::default(), Box::new(Placeholder));
//! let report = pipeline.run(Path::new("src/main/java"), Path::new("docs")).unwrap();
//! println!("{} types", report.entities);
//! ```

pub mod annotate;
pub mod cli;
pub mod config;
pub mod describe;
pub mod discover;
pub mod error;
pub mod extract;
pub mod graph;
pub mod logging;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod render;
pub mod symbols;
pub mod syntax;

// Re-exports for convenience
pub use config::ComprehendConfig;
pub use describe::{Describer, Placeholder};
pub use error::{ComprehendError, ParseError, Result};
pub use extract::{extract_source, extract_unit};
pub use graph::{derive_relationships, DependencyGraph, RelationKind, Relationship};
pub use model::{MemberField, MemberMethod, SourceUnit, TypeEntity};
pub use parser::parse_source;
pub use pipeline::{analyze, Analysis, Pipeline, RunReport};
pub use symbols::SymbolIndex;
pub use syntax::{Node, NodeKind, Span};
