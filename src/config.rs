//! Tool configuration for codemap.
//!
//! A `codemap.yaml` file tunes discovery: which files count as sources,
//! which are excluded, and how the project root is recognised. Every field
//! is optional and falls back to the defaults below.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{MapError, Result};

/// File names searched for in the start directory, in order.
pub const CONFIG_FILE_NAMES: &[&str] = &["codemap.yaml", ".codemap.yaml", "codemap.yml"];

/// Declaration and generated files. Always excluded.
pub const DEFAULT_EXCLUDED_PATHS: &[&str] = &[
    "**/*.d.ts",
    "**/*.d.mts",
    "**/*.d.cts",
    "**/*.generated.*",
];

/// Test, spec and mock files. Excluded unless `include_test_files` is set.
pub const TEST_FILE_PATTERNS: &[&str] = &[
    "**/*.test.*",
    "**/*.spec.*",
    "**/*.mock.*",
    "**/*.mocks.*",
    "**/__mocks__/**",
    "**/__tests__/**",
];

/// Extra source globs added when `tsconfig.json` sets `allowJs`.
pub const JS_SOURCE_GLOBS: &[&str] = &["**/*.js", "**/*.jsx", "**/*.mjs", "**/*.cjs"];

/// Top-level codemap configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MapConfig {
    #[serde(default = "default_version")]
    pub version: String,
    /// Key of the project in the output map. Defaults to the base name of
    /// the working directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    /// Globs selecting source files, relative to the project root.
    #[serde(default = "default_source_globs")]
    pub source_globs: Vec<String>,
    /// Glob patterns excluded in addition to the built-in ones (e.g. "**/legacy/**")
    #[serde(default)]
    pub excluded_paths: Vec<String>,
    /// Directory names never descended into. Hidden directories are always skipped.
    #[serde(default = "default_excluded_dirs")]
    pub excluded_dirs: Vec<String>,
    /// Files whose presence marks the project root.
    #[serde(default = "default_manifest_markers")]
    pub manifest_markers: Vec<String>,
    /// Whether to map test, spec and mock files (default: false)
    #[serde(default)]
    pub include_test_files: bool,
}

fn default_version() -> String {
    "1".to_string()
}

fn default_source_globs() -> Vec<String> {
    ["**/*.ts", "**/*.tsx", "**/*.mts", "**/*.cts"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_excluded_dirs() -> Vec<String> {
    ["node_modules", "dist", "build", "out", "coverage"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_manifest_markers() -> Vec<String> {
    vec!["package.json".to_string()]
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            project_name: None,
            source_globs: default_source_globs(),
            excluded_paths: Vec::new(),
            excluded_dirs: default_excluded_dirs(),
            manifest_markers: default_manifest_markers(),
            include_test_files: false,
        }
    }
}

impl MapConfig {
    /// Parse a configuration from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).map_err(|e| MapError::configuration(path, e.to_string()))?;
        let config: MapConfig = serde_yaml::from_str(&content)
            .map_err(|e| MapError::configuration(path, e.to_string()))?;
        validate(&config).map_err(|e| MapError::configuration(path, e))?;
        Ok(config)
    }

    /// Find a configuration file in `dir`.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    }

    /// Load the explicit file if given, else a discovered one, else defaults.
    pub fn load(dir: &Path, explicit: Option<&Path>) -> Result<Self> {
        match explicit.map(Path::to_path_buf).or_else(|| Self::discover(dir)) {
            Some(path) => Self::parse_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Every exclusion glob in effect: built-ins, test patterns unless test
    /// files are included, then the user's own.
    pub fn exclusion_patterns(&self) -> Vec<String> {
        let mut patterns: Vec<String> = DEFAULT_EXCLUDED_PATHS.iter().map(|s| s.to_string()).collect();
        if !self.include_test_files {
            patterns.extend(TEST_FILE_PATTERNS.iter().map(|s| s.to_string()));
        }
        patterns.extend(self.excluded_paths.iter().cloned());
        patterns
    }

    /// Render the configuration as YAML, for `codemap init`.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| MapError::configuration("codemap.yaml", e.to_string()))
    }
}

/// Validate a configuration for correctness.
pub fn validate(config: &MapConfig) -> std::result::Result<(), String> {
    if config.source_globs.is_empty() {
        return Err("source_globs must not be empty".to_string());
    }
    if config.manifest_markers.is_empty() {
        return Err("manifest_markers must not be empty".to_string());
    }

    for pattern in config.source_globs.iter().chain(&config.excluded_paths) {
        globset::Glob::new(pattern).map_err(|e| format!("invalid glob {:?}: {}", pattern, e))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_config() {
        let yaml = r#"
version: "1"
project_name: "web"
excluded_paths:
  - "**/legacy/**"
include_test_files: true
"#;
        let config: MapConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.project_name.as_deref(), Some("web"));
        assert!(config.include_test_files);
        assert_eq!(config.source_globs, default_source_globs());
        assert_eq!(config.manifest_markers, vec!["package.json"]);
    }

    #[test]
    fn test_exclusion_patterns() {
        let mut config = MapConfig::default();
        assert!(config.exclusion_patterns().contains(&"**/*.spec.*".to_string()));

        config.include_test_files = true;
        config.excluded_paths.push("**/legacy/**".to_string());
        let patterns = config.exclusion_patterns();
        assert!(!patterns.contains(&"**/*.spec.*".to_string()));
        assert!(patterns.contains(&"**/*.d.ts".to_string()));
        assert!(patterns.contains(&"**/legacy/**".to_string()));
    }

    #[test]
    fn test_validate_rejects_bad_globs() {
        let config = MapConfig {
            excluded_paths: vec!["src/[".to_string()],
            ..Default::default()
        };
        assert!(validate(&config).is_err());

        let config = MapConfig {
            manifest_markers: Vec::new(),
            ..Default::default()
        };
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_load_discovers_and_defaults() {
        let temp = TempDir::new().unwrap();
        assert_eq!(MapConfig::load(temp.path(), None).unwrap(), MapConfig::default());

        fs::write(temp.path().join(".codemap.yaml"), "project_name: found\n").unwrap();
        let config = MapConfig::load(temp.path(), None).unwrap();
        assert_eq!(config.project_name.as_deref(), Some("found"));
    }

    #[test]
    fn test_invalid_yaml_is_configuration_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("codemap.yaml");
        fs::write(&path, "source_globs: [unclosed\n").unwrap();

        let err = MapConfig::load(temp.path(), None).unwrap_err();
        assert!(matches!(err, MapError::Configuration { .. }));
    }

    #[test]
    fn test_default_round_trips_through_yaml() {
        let yaml = MapConfig::default().to_yaml().unwrap();
        let parsed: MapConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, MapConfig::default());
    }
}
