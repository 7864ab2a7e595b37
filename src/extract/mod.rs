//! Declaration extraction.
//!
//! [`Extractor`] turns single AST nodes into records (`declarations`) and
//! routes the children of a class or module to the right extractor
//! (`aggregate`). It only reads the tree; all parsing, type resolution and
//! printing is delegated to a [`SourceProvider`].

mod aggregate;
mod declarations;

use tracing::error;
use tree_sitter::Node;

use crate::error::Result;
use crate::program::{ParsedFile, SourceProvider};

pub use aggregate::{classify, AccessorKind, Container, Member, NodeCategory};

/// Extracts declaration records with the help of a source provider.
pub struct Extractor<'p> {
    provider: &'p dyn SourceProvider,
}

impl<'p> Extractor<'p> {
    pub fn new(provider: &'p dyn SourceProvider) -> Self {
        Self { provider }
    }

    /// Text of a node's `name` field, if it has a non-empty one.
    fn declared_name(&self, node: Node<'_>, file: &ParsedFile) -> Option<String> {
        let name = file.node_text(node.child_by_field_name("name")?);
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }
}

/// Log an extraction failure with its method and node, then hand it back.
fn logged<T>(method: &'static str, node: Node<'_>, file: &ParsedFile, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        error!(
            method = method,
            kind = node.kind(),
            file = %file.path.display(),
            line = node.start_position().row + 1,
            error = %e,
            "failed to extract declaration"
        );
    }
    result
}
