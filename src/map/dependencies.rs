//! Import statements of a module.

use crate::error::Result;
use crate::program::{ParsedFile, PrintMode, SourceProvider};

/// Printed text of every top-level import declaration, in source order.
///
/// `import x = require('y')` is an import-equals declaration, not an import,
/// and is left out. Each entry ends with `;`.
pub fn build_dependency_graph(provider: &dyn SourceProvider, file: &ParsedFile) -> Result<Vec<String>> {
    let root = file.root();
    let mut cursor = root.walk();
    let imports: Vec<_> = root
        .named_children(&mut cursor)
        .filter(|node| node.kind() == "import_statement")
        .filter(|node| {
            let mut inner = node.walk();
            let is_require = node
                .named_children(&mut inner)
                .any(|child| child.kind() == "import_require_clause");
            !is_require
        })
        .collect();

    imports
        .into_iter()
        .map(|node| {
            let mut text = provider.print(node, file, PrintMode::PreserveComments)?;
            if !text.ends_with(';') {
                text.push(';');
            }
            Ok(text)
        })
        .collect()
}
