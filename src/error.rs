//! Error types for Comprehender.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn source text into a syntax tree.
///
/// `Syntax` means the grammar rejected the text; `Parser` means the parser
/// itself could not run. Both are handled the same way (log and skip the
/// file) but are reported differently.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("syntax error at line {line}: {detail}")]
    Syntax { line: usize, detail: String },

    #[error("parser failure: {0}")]
    Parser(String),
}

#[derive(Debug, Error)]
pub enum ComprehendError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("{}: tree root is not a compilation unit", path.display())]
    UnexpectedRoot { path: PathBuf },

    #[error("{}: type `{name}` is declared more than once", path.display())]
    DuplicateType { path: PathBuf, name: String },

    #[error("invalid exclude pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("invalid configuration in {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("description service request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("description service returned no text")]
    EmptyResponse,

    #[error("failed to serialize project structure: {0}")]
    Json(#[from] serde_json::Error),

    #[error("source directory not found: {}", .0.display())]
    SourceDirMissing(PathBuf),

    #[error("no source files could be processed")]
    NothingProcessed,
}

impl ComprehendError {
    /// True when the file was skipped because the grammar rejected it.
    pub fn is_syntax_error(&self) -> bool {
        matches!(
            self,
            ComprehendError::Parse {
                source: ParseError::Syntax { .. },
                ..
            }
        )
    }
}

pub type Result<T> = std::result::Result<T, ComprehendError>;
