//! Parse and type provider backed by tree-sitter.
//!
//! The extractors never parse text themselves. They ask a [`SourceProvider`]
//! for parsed trees, type display strings, printed node text, and doc
//! comments. [`Program`] is the tree-sitter implementation:
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────────┐
//! │ Root files   │────▶│ Program      │────▶│ ParsedFile cache │
//! └──────────────┘     │ (rayon)      │     │ (read-only)      │
//!                      └──────────────┘     └──────────────────┘
//!                             │
//!              ┌──────────────┼──────────────┐
//!              ▼              ▼              ▼
//!         checker.rs     printer.rs     tsconfig.rs
//!        (type text)   (print, docs)  (compiler options)
//! ```

mod checker;
mod printer;
mod tsconfig;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, warn};
use tree_sitter::{Language, Node, Parser};

use crate::error::{MapError, Result};

pub use printer::PrintMode;
pub use tsconfig::{CompilerOptions, TsConfig, TSCONFIG_FILE};

/// Grammar used to parse a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    TypeScript,
    Tsx,
}

impl Dialect {
    /// Pick the grammar for a file extension (without dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "ts" | "mts" | "cts" => Some(Dialect::TypeScript),
            "tsx" | "js" | "jsx" | "mjs" | "cjs" => Some(Dialect::Tsx),
            _ => None,
        }
    }

    /// Pick the grammar for a path.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn language(&self) -> Language {
        match self {
            Dialect::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Dialect::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

/// A parsed tree-sitter tree with the source it was parsed from.
pub struct ParsedFile {
    /// The tree-sitter parse tree.
    pub tree: tree_sitter::Tree,
    /// The original source code (kept for node text extraction).
    pub source: Vec<u8>,
    /// Absolute path of the file.
    pub path: PathBuf,
    pub dialect: Dialect,
}

impl ParsedFile {
    /// Parse `source` as the dialect implied by `path`.
    pub fn parse(path: &Path, source: Vec<u8>) -> Result<Self> {
        let dialect = Dialect::from_path(path).unwrap_or(Dialect::TypeScript);
        let mut parser = Parser::new();
        parser.set_language(&dialect.language())?;
        let tree = parser
            .parse(&source, None)
            .ok_or_else(|| MapError::MissingSourceFile {
                path: path.to_path_buf(),
            })?;

        Ok(Self {
            tree,
            source,
            path: path.to_path_buf(),
            dialect,
        })
    }

    /// Read and parse a file from disk.
    pub fn read(path: &Path) -> Result<Self> {
        let source = fs::read(path)?;
        Self::parse(path, source)
    }

    /// Get text for a tree-sitter node.
    pub fn node_text(&self, node: Node) -> &str {
        node.utf8_text(&self.source).unwrap_or("")
    }

    /// The path as a display string, for logs and errors.
    pub fn display_path(&self) -> String {
        self.path.to_string_lossy().to_string()
    }

    /// Root node of the tree.
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }
}

/// The services the extractors need from a parser and type resolver.
///
/// [`Program`] implements this over tree-sitter. Other implementations can
/// wrap a `Program` to change how types are resolved.
pub trait SourceProvider {
    /// Root file names the provider was created with.
    fn root_file_names(&self) -> Option<&[PathBuf]>;

    /// Parsed tree for a file, if one is available.
    fn source_file(&self, path: &Path) -> Option<&ParsedFile>;

    /// Display string for an explicit type node or type annotation.
    fn resolve_type(&self, node: Node<'_>, file: &ParsedFile) -> Option<String>;

    /// Type inferred for an unannotated declaration.
    fn infer_type(&self, node: Node<'_>, file: &ParsedFile) -> Option<String>;

    /// Render a node back to source text.
    fn print(&self, node: Node<'_>, file: &ParsedFile, mode: PrintMode) -> Result<String>;

    /// Documentation comment text attached to a declaration.
    fn doc_comment(&self, node: Node<'_>, file: &ParsedFile) -> String;
}

/// A set of parsed root files.
///
/// The parse cache is filled once in [`Program::create`] and never changes
/// afterwards.
pub struct Program {
    root_names: Vec<PathBuf>,
    files: HashMap<PathBuf, ParsedFile>,
}

impl Program {
    /// Parse every root file.
    ///
    /// Files that cannot be read or parsed are logged and left out of the
    /// cache; asking for them later yields `None`.
    pub fn create(root_names: Vec<PathBuf>) -> Self {
        let parsed: Vec<(PathBuf, Result<ParsedFile>)> = root_names
            .par_iter()
            .map(|path| (path.clone(), ParsedFile::read(path)))
            .collect();

        let mut files = HashMap::with_capacity(parsed.len());
        for (path, result) in parsed {
            match result {
                Ok(file) => {
                    files.insert(path, file);
                }
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "failed to parse source file");
                }
            }
        }

        debug!(
            roots = root_names.len(),
            parsed = files.len(),
            "created program"
        );

        Self {
            root_names,
            files,
        }
    }

    /// Number of files with a parsed tree.
    pub fn parsed_count(&self) -> usize {
        self.files.len()
    }
}

impl SourceProvider for Program {
    fn root_file_names(&self) -> Option<&[PathBuf]> {
        Some(&self.root_names)
    }

    fn source_file(&self, path: &Path) -> Option<&ParsedFile> {
        self.files.get(path)
    }

    fn resolve_type(&self, node: Node<'_>, file: &ParsedFile) -> Option<String> {
        checker::resolve_type(node, file)
    }

    fn infer_type(&self, node: Node<'_>, file: &ParsedFile) -> Option<String> {
        checker::infer_type(node, file)
    }

    fn print(&self, node: Node<'_>, file: &ParsedFile, mode: PrintMode) -> Result<String> {
        printer::print(node, file, mode)
    }

    fn doc_comment(&self, node: Node<'_>, file: &ParsedFile) -> String {
        printer::doc_comment(node, file)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Parse an in-memory TypeScript snippet.
    pub fn parse_ts(source: &str) -> ParsedFile {
        ParsedFile::parse(Path::new("test.ts"), source.as_bytes().to_vec()).unwrap()
    }

    /// First top-level node of the given kind, unwrapping `export`.
    pub fn find_node<'a>(file: &'a ParsedFile, kind: &str) -> Node<'a> {
        fn walk<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
            if node.kind() == kind {
                return Some(node);
            }
            let mut cursor = node.walk();
            let children: Vec<_> = node.children(&mut cursor).collect();
            children.into_iter().find_map(|child| walk(child, kind))
        }
        walk(file.root(), kind).unwrap_or_else(|| panic!("no {} node", kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_dialect_from_extension() {
        assert_eq!(Dialect::from_extension("ts"), Some(Dialect::TypeScript));
        assert_eq!(Dialect::from_extension("tsx"), Some(Dialect::Tsx));
        assert_eq!(Dialect::from_extension("js"), Some(Dialect::Tsx));
        assert_eq!(Dialect::from_extension("rs"), None);
    }

    #[test]
    fn test_program_caches_parsed_roots() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.ts");
        let b = temp.path().join("b.tsx");
        fs::write(&a, "export const a = 1;").unwrap();
        fs::write(&b, "export const B = () => <div/>;").unwrap();

        let program = Program::create(vec![a.clone(), b.clone()]);

        assert_eq!(program.parsed_count(), 2);
        assert_eq!(program.root_file_names().unwrap().len(), 2);
        assert_eq!(program.source_file(&a).unwrap().dialect, Dialect::TypeScript);
        assert_eq!(program.source_file(&b).unwrap().dialect, Dialect::Tsx);
    }

    #[test]
    fn test_program_skips_unreadable_roots() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("gone.ts");

        let program = Program::create(vec![missing.clone()]);

        assert_eq!(program.parsed_count(), 0);
        assert!(program.source_file(&missing).is_none());
        assert_eq!(program.root_file_names().unwrap(), &[missing][..]);
    }
}
