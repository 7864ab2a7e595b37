//! Records produced by declaration extraction.
//!
//! Every record is built once by an extractor and then only appended to its
//! owning container. Field names serialize in camelCase and absent optionals
//! are omitted, so the JSON form matches what downstream indexers consume.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A class property, function parameter, or typed slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyInfo {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
}

impl PropertyInfo {
    pub fn new(name: impl Into<String>, type_name: Option<String>) -> Self {
        Self {
            name: name.into(),
            type_name,
        }
    }
}

/// A named function, method, getter, or setter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionInfo {
    pub name: String,
    /// Printed source of the declaration with comments removed.
    pub content: String,
    pub parameters: Vec<PropertyInfo>,
    #[serde(default = "any_type")]
    pub return_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

fn any_type() -> String {
    ANY_TYPE.to_string()
}

/// Type reported when nothing is declared and nothing can be inferred.
pub const ANY_TYPE: &str = "any";

/// Return type recorded for setters.
pub const VOID_TYPE: &str = "void";

/// A single enum member. `value` is the initializer text, never defaulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumMember {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumInfo {
    pub name: String,
    pub members: Vec<EnumMember>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceInfo {
    pub name: String,
    pub properties: Vec<PropertyInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// A class declaration and its direct members, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub functions: Vec<FunctionInfo>,
    pub properties: Vec<PropertyInfo>,
    pub interfaces: Vec<InterfaceInfo>,
    pub enums: Vec<EnumInfo>,
}

impl ClassInfo {
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }
}

/// One source file. Top-level declarations live here; class members live
/// in their `ClassInfo`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInfo {
    /// Path relative to the project root, `/`-separated.
    pub path: String,
    pub classes: Vec<ClassInfo>,
    pub functions: Vec<FunctionInfo>,
    pub interfaces: Vec<InterfaceInfo>,
    pub enums: Vec<EnumInfo>,
    pub dependencies: Vec<String>,
}

impl ModuleInfo {
    pub fn new(path: impl Into<String>, dependencies: Vec<String>) -> Self {
        Self {
            path: path.into(),
            dependencies,
            ..Default::default()
        }
    }

    /// Whether the file declared nothing this map records.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
            && self.functions.is_empty()
            && self.interfaces.is_empty()
            && self.enums.is_empty()
    }
}

/// Modules of a single project, keyed by root-relative path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMap {
    pub modules: BTreeMap<String, ModuleInfo>,
}

/// The full map: exactly one project key per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodebaseMap {
    projects: BTreeMap<String, ProjectMap>,
}

impl CodebaseMap {
    /// Create an empty map holding one project.
    pub fn new(project_name: impl Into<String>) -> Self {
        let mut projects = BTreeMap::new();
        projects.insert(project_name.into(), ProjectMap::default());
        Self { projects }
    }

    /// The project's name.
    pub fn project_name(&self) -> &str {
        self.projects.keys().next().map(String::as_str).unwrap_or("")
    }

    /// The project's modules.
    pub fn modules(&self) -> &BTreeMap<String, ModuleInfo> {
        static EMPTY: BTreeMap<String, ModuleInfo> = BTreeMap::new();
        self.projects
            .values()
            .next()
            .map(|p| &p.modules)
            .unwrap_or(&EMPTY)
    }

    /// Look up a module by its root-relative path.
    pub fn module(&self, path: &str) -> Option<&ModuleInfo> {
        self.modules().get(path)
    }

    /// Attach a completed module under its path.
    ///
    /// Returns the module previously stored under the same path, if any.
    pub fn insert_module(&mut self, module: ModuleInfo) -> Option<ModuleInfo> {
        let project = self.projects.values_mut().next()?;
        project.modules.insert(module.path.clone(), module)
    }

    /// Totals across every module, for summaries.
    pub fn stats(&self) -> MapStats {
        let mut stats = MapStats::default();
        for module in self.modules().values() {
            stats.modules += 1;
            stats.classes += module.classes.len();
            stats.functions += module.functions.len()
                + module.classes.iter().map(|c| c.functions.len()).sum::<usize>();
            stats.interfaces += module.interfaces.len()
                + module.classes.iter().map(|c| c.interfaces.len()).sum::<usize>();
            stats.enums += module.enums.len()
                + module.classes.iter().map(|c| c.enums.len()).sum::<usize>();
            stats.dependencies += module.dependencies.len();
        }
        stats
    }
}

/// Declaration counts for a map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MapStats {
    pub modules: usize,
    pub classes: usize,
    pub functions: usize,
    pub interfaces: usize,
    pub enums: usize,
    pub dependencies: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_info_serializes_camel_case() {
        let func = FunctionInfo {
            name: "log".to_string(),
            content: "log(message: string): void {}".to_string(),
            parameters: vec![PropertyInfo::new("message", Some("string".to_string()))],
            return_type: "void".to_string(),
            comments: None,
        };

        let json = serde_json::to_value(&func).unwrap();
        assert_eq!(json["returnType"], "void");
        assert_eq!(json["parameters"][0]["type"], "string");
        assert!(json.get("comments").is_none());
    }

    #[test]
    fn test_untyped_property_omits_type() {
        let json = serde_json::to_string(&PropertyInfo::new("x", None)).unwrap();
        assert_eq!(json, r#"{"name":"x"}"#);
    }

    #[test]
    fn test_codebase_map_has_single_project() {
        let mut map = CodebaseMap::new("demo");
        map.insert_module(ModuleInfo::new("src/a.ts", vec![]));
        map.insert_module(ModuleInfo::new("src/b.ts", vec![]));

        let json = serde_json::to_value(&map).unwrap();
        let projects = json.as_object().unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(json["demo"]["modules"].as_object().unwrap().len(), 2);
        assert_eq!(map.project_name(), "demo");
        assert!(map.module("src/a.ts").is_some());
    }

    #[test]
    fn test_stats_counts_class_members() {
        let mut module = ModuleInfo::new("a.ts", vec!["import x from 'y';".to_string()]);
        let mut class = ClassInfo::new(Some("A".to_string()));
        class.functions.push(FunctionInfo {
            name: "run".to_string(),
            content: String::new(),
            parameters: vec![],
            return_type: ANY_TYPE.to_string(),
            comments: None,
        });
        module.classes.push(class);

        let mut map = CodebaseMap::new("p");
        map.insert_module(module);

        let stats = map.stats();
        assert_eq!(stats.modules, 1);
        assert_eq!(stats.classes, 1);
        assert_eq!(stats.functions, 1);
        assert_eq!(stats.dependencies, 1);
    }
}
