//! Error taxonomy for codebase map construction.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building a codebase map.
///
/// `MalformedNode` is raised by the declaration extractors and propagated
/// after being logged. `MissingSourceFile` and `Configuration` abort the run.
#[derive(Error, Debug)]
pub enum MapError {
    #[error("{method}: malformed {kind} node at {file}:{line}: {reason}")]
    MalformedNode {
        method: &'static str,
        kind: String,
        file: String,
        line: usize,
        reason: String,
    },
    #[error("no parsed source file for {}", path.display())]
    MissingSourceFile { path: PathBuf },
    #[error("invalid configuration {}: {message}", path.display())]
    Configuration { path: PathBuf, message: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("walking source tree: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("invalid glob: {0}")]
    Glob(#[from] globset::Error),
    #[error("tree-sitter language error: {0}")]
    Language(#[from] tree_sitter::LanguageError),
    #[error("tree-sitter query error: {0}")]
    Query(#[from] tree_sitter::QueryError),
    #[error("discovery task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl MapError {
    /// Build a `MalformedNode` error for a node of the given file.
    pub fn malformed(
        method: &'static str,
        node: tree_sitter::Node<'_>,
        file: &str,
        reason: impl Into<String>,
    ) -> Self {
        MapError::MalformedNode {
            method,
            kind: node.kind().to_string(),
            file: file.to_string(),
            line: node.start_position().row + 1,
            reason: reason.into(),
        }
    }

    /// Build a `Configuration` error.
    pub fn configuration(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        MapError::Configuration {
            path: path.into(),
            message: message.into(),
        }
    }
}

pub type Result<T, E = MapError> = std::result::Result<T, E>;
