//! Compiler configuration read from `tsconfig.json`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};

/// File name of the compiler configuration at the project root.
pub const TSCONFIG_FILE: &str = "tsconfig.json";

/// The subset of `tsconfig.json` the map builder honours.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TsConfig {
    #[serde(default)]
    pub compiler_options: CompilerOptions,
    /// Globs relative to the project root. When non-empty, only matching
    /// files are mapped.
    #[serde(default)]
    pub include: Vec<String>,
    /// Additional exclusion globs relative to the project root.
    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    /// Also map `.js`/`.jsx`/`.mjs`/`.cjs` sources.
    #[serde(default)]
    pub allow_js: bool,
}

impl TsConfig {
    /// Load `tsconfig.json` from the project root.
    ///
    /// A missing file yields the defaults. A file that exists but cannot be
    /// read or parsed is a configuration error.
    pub fn load(project_root: &Path) -> Result<Self> {
        let path = project_root.join(TSCONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| MapError::configuration(&path, e.to_string()))?;
        Self::parse(&content).map_err(|e| MapError::configuration(&path, e.to_string()))
    }

    /// Parse JSONC text (comments and trailing commas allowed).
    pub fn parse(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(&strip_jsonc(content))
    }
}

/// Remove `//` and `/* */` comments, then trailing commas, outside strings.
fn strip_jsonc(input: &str) -> String {
    strip_trailing_commas(&strip_comments(input))
}

fn strip_comments(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;
    let mut in_string = false;

    while i < chars.len() {
        let c = chars[i];

        if in_string {
            out.push(c);
            if c == '\\' && i + 1 < chars.len() {
                out.push(chars[i + 1]);
                i += 2;
                continue;
            }
            if c == '"' {
                in_string = false;
            }
            i += 1;
            continue;
        }

        match (c, chars.get(i + 1)) {
            ('"', _) => {
                in_string = true;
                out.push(c);
                i += 1;
            }
            ('/', Some('/')) => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            ('/', Some('*')) => {
                i += 2;
                while i + 1 < chars.len() && !(chars[i] == '*' && chars[i + 1] == '/') {
                    i += 1;
                }
                i += 2;
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}

/// Drop commas directly followed (ignoring whitespace) by `}` or `]`.
/// Expects comment-free input.
fn strip_trailing_commas(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            out.push(c);
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let next = chars[i + 1..].iter().find(|ch| !ch.is_whitespace());
                if !matches!(next, Some('}') | Some(']')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }

    out
}
