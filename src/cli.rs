//! Command-line interface for codemap.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::{MapConfig, CONFIG_FILE_NAMES};
use crate::map::CodebaseMapBuilder;
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 2;

/// Structural map of a TypeScript codebase.
///
/// Codemap parses every source file of a project and records its classes,
/// functions, properties, interfaces, enums and imports as JSON, ready to be
/// indexed or fed to other tools.
#[derive(Parser)]
#[command(name = "codemap")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the codebase map and write it as JSON
    Map(MapArgs),
    /// Write a default codemap.yaml
    Init(InitArgs),
}

/// Arguments for the map command.
#[derive(Parser)]
pub struct MapArgs {
    /// Directory to start the project root search from
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write JSON to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Emit compact JSON
    #[arg(long)]
    pub compact: bool,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "codemap.yaml")]
    pub output: PathBuf,
}

/// Run the map command.
pub async fn run_map(args: &MapArgs) -> anyhow::Result<i32> {
    let config = match MapConfig::load(&args.path, args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Run 'codemap init' to create a config file");
            return Ok(EXIT_ERROR);
        }
    };

    let builder = CodebaseMapBuilder::new(&args.path, config);
    let map = match builder.build().await {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    report::write_json(&map, args.output.as_deref(), !args.compact)?;
    if let Some(output) = &args.output {
        report::write_summary(&map, output);
    }

    Ok(EXIT_SUCCESS)
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    // Check if output already exists
    if args.output.exists() {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Remove it or use --output to specify a different path");
        return Ok(EXIT_ERROR);
    }

    // Create output directory if needed
    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("Error: failed to create directory: {}", e);
                return Ok(EXIT_ERROR);
            }
        }
    }

    let content = MapConfig::default().to_yaml()?;
    if let Err(e) = std::fs::write(&args.output, content) {
        eprintln!("Error: failed to write config: {}", e);
        return Ok(EXIT_ERROR);
    }

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to customize for your project", args.output.display());
    println!(
        "  2. Run: codemap map . (auto-discovers {})",
        CONFIG_FILE_NAMES.join(", ")
    );

    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_map_args() {
        let cli = Cli::try_parse_from(["codemap", "map", "web", "--compact", "-v"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Map(args) => {
                assert_eq!(args.path, PathBuf::from("web"));
                assert!(args.compact);
                assert!(args.output.is_none());
            }
            Commands::Init(_) => panic!("expected map command"),
        }
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("codemap.yaml");

        let args = InitArgs {
            output: output.clone(),
        };
        assert_eq!(run_init(&args).unwrap(), EXIT_SUCCESS);
        let written = MapConfig::parse_file(&output).unwrap();
        assert_eq!(written, MapConfig::default());

        assert_eq!(run_init(&args).unwrap(), EXIT_ERROR);
    }
}
