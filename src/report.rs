//! Output formatting for codemap results.
//!
//! - JSON: the codebase map itself, on stdout or in a file
//! - Summary: one colored line on stderr for humans when the map goes to a file

use colored::*;
use std::fs;
use std::path::Path;

use crate::model::{CodebaseMap, MapStats};

/// Serialize a map, pretty-printed or compact.
pub fn render_json(map: &CodebaseMap, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(map)
    } else {
        serde_json::to_string(map)
    }
}

/// Write the map as JSON to `output`, or to stdout when no file is given.
pub fn write_json(map: &CodebaseMap, output: Option<&Path>, pretty: bool) -> anyhow::Result<()> {
    let json = render_json(map, pretty)?;
    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(path, format!("{}\n", json))?;
        }
        None => println!("{}", json),
    }
    Ok(())
}

/// Write a one-line summary of the map to stderr.
pub fn write_summary(map: &CodebaseMap, output: &Path) {
    let stats = map.stats();
    eprint!("  {} ", "codemap".cyan().bold());
    eprint!("{} ", map.project_name().bold());
    eprint!("{}", summary_counts(&stats));
    eprint!("  {} ", "→".dimmed());
    eprintln!("{}", output.display().to_string().blue());
}

fn summary_counts(stats: &MapStats) -> String {
    [
        (stats.modules, "module"),
        (stats.classes, "class"),
        (stats.functions, "function"),
        (stats.interfaces, "interface"),
        (stats.enums, "enum"),
    ]
    .iter()
    .map(|(count, noun)| plural(*count, noun))
    .collect::<Vec<_>>()
    .join(", ")
}

fn plural(count: usize, noun: &str) -> String {
    match (count, noun.ends_with('s')) {
        (1, _) => format!("{} {}", count, noun),
        (_, true) => format!("{} {}es", count, noun),
        _ => format!("{} {}s", count, noun),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModuleInfo;
    use tempfile::TempDir;

    #[test]
    fn test_summary_counts() {
        let stats = MapStats {
            modules: 2,
            classes: 1,
            functions: 3,
            interfaces: 0,
            enums: 1,
            dependencies: 4,
        };
        assert_eq!(
            summary_counts(&stats),
            "2 modules, 1 class, 3 functions, 0 interfaces, 1 enum"
        );
    }

    #[test]
    fn test_compact_json_is_single_line() {
        let mut map = CodebaseMap::new("demo");
        map.insert_module(ModuleInfo::new("a.ts", vec![]));

        let compact = render_json(&map, false).unwrap();
        assert!(!compact.contains('\n'));
        assert!(render_json(&map, true).unwrap().contains('\n'));
    }

    #[test]
    fn test_write_json_to_file() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out/map.json");
        let map = CodebaseMap::new("demo");

        write_json(&map, Some(&out), true).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert!(written["demo"]["modules"].is_object());
    }
}
