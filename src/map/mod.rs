//! Codebase map construction.
//!
//! ```text
//! find_project_root ─▶ TsConfig::load ─▶ SourceDiscovery ─▶ Program::create
//!                                          (async walk)       (parallel parse)
//!                                                                  │
//!        CodebaseMap ◀── insert_module ◀── extract_module ◀────────┘
//!                                            + build_dependency_graph
//! ```
//!
//! Only discovery awaits. Once the program is created every file is
//! extracted in order, and the first failure aborts the whole map.

mod dependencies;
mod discovery;

use std::env;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::MapConfig;
use crate::error::{MapError, Result};
use crate::extract::Extractor;
use crate::model::CodebaseMap;
use crate::program::{Program, SourceProvider, TsConfig};

pub use dependencies::build_dependency_graph;
pub use discovery::{find_project_root, relative_key, SourceDiscovery};

/// Builds a [`CodebaseMap`] for the project containing a start directory.
pub struct CodebaseMapBuilder {
    start_dir: PathBuf,
    config: MapConfig,
}

impl CodebaseMapBuilder {
    pub fn new(start_dir: impl Into<PathBuf>, config: MapConfig) -> Self {
        Self {
            start_dir: start_dir.into(),
            config,
        }
    }

    /// Discover, parse and extract every source file of the project.
    pub async fn build(&self) -> Result<CodebaseMap> {
        let root = find_project_root(&self.start_dir, &self.config.manifest_markers)?;
        let tsconfig = TsConfig::load(&root)?;
        let discovery = SourceDiscovery::new(&root, &self.config, &tsconfig)?;
        let files = discovery.source_files().await?;

        info!(root = %root.display(), files = files.len(), "mapping project");

        let program = Program::create(files);
        let map = assemble(&program, &root, self.project_name()?)?;

        let stats = map.stats();
        info!(
            modules = stats.modules,
            classes = stats.classes,
            functions = stats.functions,
            "built codebase map"
        );
        Ok(map)
    }

    /// The configured project name, else the working directory's base name.
    fn project_name(&self) -> Result<String> {
        if let Some(name) = &self.config.project_name {
            return Ok(name.clone());
        }
        let cwd = env::current_dir()?;
        Ok(cwd
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "root".to_string()))
    }
}

/// Extract every root file of `provider` into a map.
///
/// Files are keyed by their path relative to `root`. A root file the
/// provider has no tree for is a [`MapError::MissingSourceFile`].
pub fn assemble(
    provider: &dyn SourceProvider,
    root: &Path,
    project_name: impl Into<String>,
) -> Result<CodebaseMap> {
    let mut map = CodebaseMap::new(project_name);
    let extractor = Extractor::new(provider);

    for path in provider.root_file_names().unwrap_or_default() {
        let file = provider
            .source_file(path)
            .ok_or_else(|| MapError::MissingSourceFile { path: path.clone() })?;

        let key = relative_key(path.strip_prefix(root).unwrap_or(path));
        let dependencies = build_dependency_graph(provider, file)?;
        let module = extractor.extract_module(file, key, dependencies)?;
        map.insert_module(module);
    }

    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::{ParsedFile, PrintMode};
    use std::fs;
    use tempfile::TempDir;
    use tree_sitter::Node;

    /// A provider that cannot print method declarations.
    struct BrokenMethods(Program);

    impl SourceProvider for BrokenMethods {
        fn root_file_names(&self) -> Option<&[PathBuf]> {
            self.0.root_file_names()
        }
        fn source_file(&self, path: &Path) -> Option<&ParsedFile> {
            self.0.source_file(path)
        }
        fn resolve_type(&self, node: Node<'_>, file: &ParsedFile) -> Option<String> {
            self.0.resolve_type(node, file)
        }
        fn infer_type(&self, node: Node<'_>, file: &ParsedFile) -> Option<String> {
            self.0.infer_type(node, file)
        }
        fn print(&self, node: Node<'_>, file: &ParsedFile, mode: PrintMode) -> Result<String> {
            if node.kind() == "method_definition" {
                return Err(MapError::malformed(
                    "print",
                    node,
                    &file.display_path(),
                    "cannot render method",
                ));
            }
            self.0.print(node, file, mode)
        }
        fn doc_comment(&self, node: Node<'_>, file: &ParsedFile) -> String {
            self.0.doc_comment(node, file)
        }
    }

    #[test]
    fn test_assemble_keys_by_relative_path() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("src/util")).unwrap();
        let a = root.join("src/util/a.ts");
        fs::write(&a, "export function a(): number { return 1; }").unwrap();

        let program = Program::create(vec![a]);
        let map = assemble(&program, root, "demo").unwrap();

        let module = map.module("src/util/a.ts").unwrap();
        assert_eq!(module.path, "src/util/a.ts");
        assert_eq!(module.functions[0].name, "a");
    }

    #[test]
    fn test_assemble_fails_on_missing_tree() {
        let temp = TempDir::new().unwrap();
        let good = temp.path().join("good.ts");
        fs::write(&good, "export const x = 1;").unwrap();
        let missing = temp.path().join("missing.ts");

        let program = Program::create(vec![good, missing.clone()]);
        let err = assemble(&program, temp.path(), "demo").unwrap_err();

        assert!(matches!(err, MapError::MissingSourceFile { path } if path == missing));
    }

    #[test]
    fn test_extraction_failure_fails_whole_map() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.ts");
        let b = temp.path().join("b.ts");
        fs::write(&a, "export function ok(): void {}").unwrap();
        fs::write(&b, "import { x } from './x';\nexport class Service {\n    run(): void {}\n}").unwrap();

        let provider = BrokenMethods(Program::create(vec![a, b]));
        let err = assemble(&provider, temp.path(), "demo").unwrap_err();

        match err {
            MapError::MalformedNode { kind, line, file, .. } => {
                assert_eq!(kind, "method_definition");
                assert_eq!(line, 3);
                assert!(file.ends_with("b.ts"));
            }
            other => panic!("expected MalformedNode, got {:?}", other),
        }
    }

    #[test]
    fn test_imports_only_module() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("setup.ts");
        fs::write(&path, "import a from './a';\nimport './b';\n").unwrap();

        let program = Program::create(vec![path]);
        let map = assemble(&program, temp.path(), "demo").unwrap();

        let module = map.module("setup.ts").unwrap();
        assert!(module.classes.is_empty());
        assert!(module.functions.is_empty());
        assert!(module.interfaces.is_empty());
        assert!(module.enums.is_empty());
        assert_eq!(
            module.dependencies,
            vec!["import a from './a';", "import './b';"]
        );
    }

    #[test]
    fn test_project_name_from_config() {
        let config = MapConfig {
            project_name: Some("web".to_string()),
            ..Default::default()
        };
        let builder = CodebaseMapBuilder::new(".", config);
        assert_eq!(builder.project_name().unwrap(), "web");
    }
}
