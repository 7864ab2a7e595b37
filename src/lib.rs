//! Codemap - structural metadata for TypeScript codebases.
//!
//! Codemap walks a project, parses each source file with tree-sitter, and
//! records its classes, functions, properties, interfaces, enums and import
//! statements in a [`CodebaseMap`].
//!
//! # Architecture
//!
//! - `program`: Parse/type provider (`SourceProvider`) over tree-sitter
//! - `extract`: Declaration extractors and the member aggregator
//! - `map`: Project root lookup, discovery, dependencies, map assembly
//! - `model`: Output records
//! - `config`: YAML configuration schema
//! - `report`: Output formatting (JSON, summary)
//!
//! # Example
//!
//! ```no_run
//! use codemap::{CodebaseMapBuilder, MapConfig};
//!
//! # async fn run() -> codemap::Result<()> {
//! let map = CodebaseMapBuilder::new(".", MapConfig::default()).build().await?;
//! println!("{} modules", map.modules().len());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod map;
pub mod model;
pub mod program;
pub mod report;

pub use config::MapConfig;
pub use error::{MapError, Result};
pub use extract::{classify, Container, Extractor, Member, NodeCategory};
pub use map::{assemble, build_dependency_graph, find_project_root, CodebaseMapBuilder, SourceDiscovery};
pub use model::{
    ClassInfo, CodebaseMap, EnumInfo, EnumMember, FunctionInfo, InterfaceInfo, MapStats,
    ModuleInfo, PropertyInfo,
};
pub use program::{CompilerOptions, ParsedFile, PrintMode, Program, SourceProvider, TsConfig};
