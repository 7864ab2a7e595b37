//! Project root lookup and source file discovery.

use std::env;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::debug;
use walkdir::WalkDir;

use crate::config::{MapConfig, JS_SOURCE_GLOBS};
use crate::error::Result;
use crate::program::TsConfig;

/// Walk up from `start_dir` to the nearest directory holding one of the
/// manifest `markers`.
///
/// Falls back to the current working directory when the filesystem root is
/// reached without a match.
pub fn find_project_root(start_dir: &Path, markers: &[String]) -> Result<PathBuf> {
    let cwd = env::current_dir()?;
    let start = if start_dir.is_absolute() {
        start_dir.to_path_buf()
    } else {
        cwd.join(start_dir)
    };
    let start = start.canonicalize().unwrap_or(start);

    for dir in start.ancestors() {
        if markers.iter().any(|marker| dir.join(marker).is_file()) {
            debug!(root = %dir.display(), "found project root");
            return Ok(dir.to_path_buf());
        }
    }

    debug!(root = %cwd.display(), "no manifest found, using working directory");
    Ok(cwd)
}

/// Selects the source files of a project.
///
/// A file is a source when it matches a source glob, is not excluded, and,
/// if `tsconfig.json` lists `include` patterns, matches one of them. All
/// globs are matched against the `/`-separated path relative to the root.
#[derive(Debug, Clone)]
pub struct SourceDiscovery {
    root: PathBuf,
    sources: GlobSet,
    excluded: GlobSet,
    tsconfig_excluded: GlobSet,
    included: Option<GlobSet>,
    excluded_dirs: Vec<String>,
}

impl SourceDiscovery {
    pub fn new(root: &Path, config: &MapConfig, tsconfig: &TsConfig) -> Result<Self> {
        let mut source_globs = config.source_globs.clone();
        if tsconfig.compiler_options.allow_js {
            source_globs.extend(JS_SOURCE_GLOBS.iter().map(|s| s.to_string()));
        }

        let included = if tsconfig.include.is_empty() {
            None
        } else {
            Some(build_tsconfig_globset(&tsconfig.include)?)
        };

        Ok(Self {
            root: root.to_path_buf(),
            sources: build_globset(&source_globs)?,
            excluded: build_globset(&config.exclusion_patterns())?,
            tsconfig_excluded: build_tsconfig_globset(&tsconfig.exclude)?,
            included,
            excluded_dirs: config.excluded_dirs.clone(),
        })
    }

    /// Discover source files without blocking the async runtime.
    pub async fn source_files(&self) -> Result<Vec<PathBuf>> {
        let discovery = self.clone();
        tokio::task::spawn_blocking(move || discovery.collect()).await?
    }

    /// Walk the project tree and return the sorted absolute paths of every
    /// source file.
    pub fn collect(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !e.file_type().is_dir() || !self.is_excluded_dir(e))
        {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let Ok(relative) = path.strip_prefix(&self.root) else {
                continue;
            };
            if self.is_source(relative) {
                files.push(path.to_path_buf());
            }
        }

        files.sort();
        debug!(root = %self.root.display(), count = files.len(), "discovered source files");
        Ok(files)
    }

    /// Whether a root-relative path is a source file.
    pub fn is_source(&self, relative: &Path) -> bool {
        let rel = relative_key(relative);
        if !self.sources.is_match(&rel)
            || self.excluded.is_match(&rel)
            || self.tsconfig_excluded.is_match(&rel)
        {
            return false;
        }
        match &self.included {
            Some(included) => included.is_match(&rel),
            None => true,
        }
    }

    fn is_excluded_dir(&self, entry: &walkdir::DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();
        name.starts_with('.') || self.excluded_dirs.iter().any(|d| *d == name)
    }
}

/// `/`-separated form of a relative path, used as the module key.
pub fn relative_key(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// `tsconfig.json` accepts bare directories ("src") meaning everything
/// below them.
fn expand_directory_pattern(pattern: &str) -> String {
    let pattern = pattern.trim_start_matches("./").trim_end_matches('/');
    let last = pattern.rsplit('/').next().unwrap_or(pattern);
    if pattern.contains('*') || last.contains('.') {
        pattern.to_string()
    } else {
        format!("{}/**", pattern)
    }
}

/// `tsconfig.json` globs, where `*` stays within one path segment.
fn build_tsconfig_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(&expand_directory_pattern(pattern))
            .literal_separator(true)
            .build()?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}
