//! Type display strings for annotations and syntactic inference for
//! unannotated declarations.

use lazy_static::lazy_static;
use phf::phf_map;
use regex::Regex;
use tree_sitter::Node;

use super::ParsedFile;
use crate::model::ANY_TYPE;

/// Literal node kinds and the type they infer.
static LITERAL_TYPES: phf::Map<&'static str, &'static str> = phf_map! {
    "string" => "string",
    "template_string" => "string",
    "number" => "number",
    "true" => "boolean",
    "false" => "boolean",
    "null" => "null",
    "undefined" => "undefined",
    "regex" => "RegExp",
};

lazy_static! {
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
}

/// Collapse whitespace runs so multi-line types print on one line.
fn normalize(text: &str) -> String {
    WHITESPACE_RE.replace_all(text.trim(), " ").into_owned()
}

/// Display string for a type node.
///
/// Annotation wrappers (`: T`, `: asserts x is T`, `: x is T`) resolve to the
/// type they carry; any other node is taken as the type itself.
pub(super) fn resolve_type(node: Node<'_>, file: &ParsedFile) -> Option<String> {
    let type_node = match node.kind() {
        "type_annotation" | "asserts_annotation" | "type_predicate_annotation" => {
            node.named_child(0)?
        }
        _ => node,
    };

    let text = normalize(file.node_text(type_node));
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Type of an unannotated declaration, inferred from its initializer.
///
/// A declaration without an initializer is `any`.
pub(super) fn infer_type(node: Node<'_>, file: &ParsedFile) -> Option<String> {
    match node.child_by_field_name("value") {
        Some(value) => infer_expression(value, file),
        None => Some(ANY_TYPE.to_string()),
    }
}

fn infer_expression(expr: Node<'_>, file: &ParsedFile) -> Option<String> {
    if let Some(ty) = LITERAL_TYPES.get(expr.kind()) {
        return Some((*ty).to_string());
    }

    match expr.kind() {
        "parenthesized_expression" => infer_expression(expr.named_child(0)?, file),
        "satisfies_expression" => infer_expression(expr.named_child(0)?, file),
        "as_expression" => {
            let last = expr.child(expr.child_count().checked_sub(1)?)?;
            if last.kind() == "const" {
                infer_expression(expr.named_child(0)?, file)
            } else {
                resolve_type(last, file)
            }
        }
        "new_expression" => {
            let constructor = expr.child_by_field_name("constructor")?;
            let mut ty = file.node_text(constructor).to_string();
            if let Some(args) = expr.child_by_field_name("type_arguments") {
                ty.push_str(&normalize(file.node_text(args)));
            }
            Some(ty)
        }
        "unary_expression" => {
            let operator = expr.child_by_field_name("operator")?;
            match file.node_text(operator) {
                "!" => Some("boolean".to_string()),
                "-" | "+" | "~" => Some("number".to_string()),
                "typeof" => Some("string".to_string()),
                "void" => Some("undefined".to_string()),
                _ => None,
            }
        }
        "array" => infer_array(expr, file),
        _ => None,
    }
}

fn infer_array(array: Node<'_>, file: &ParsedFile) -> Option<String> {
    let mut cursor = array.walk();
    let mut element_types: Vec<String> = Vec::new();

    for element in array.named_children(&mut cursor) {
        if element.kind() == "comment" {
            continue;
        }
        let ty = infer_expression(element, file)?;
        if !element_types.contains(&ty) {
            element_types.push(ty);
        }
    }

    match element_types.len() {
        0 => Some(format!("{}[]", ANY_TYPE)),
        1 => Some(format!("{}[]", element_types[0])),
        _ => Some(format!("({})[]", element_types.join(" | "))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::test_support::{find_node, parse_ts};

    fn field_type(source: &str) -> Option<String> {
        let file = parse_ts(source);
        let field = find_node(&file, "public_field_definition");
        match field.child_by_field_name("type") {
            Some(annotation) => resolve_type(annotation, &file),
            None => infer_type(field, &file),
        }
    }

    #[test]
    fn test_resolve_annotation() {
        assert_eq!(
            field_type("class A { level: LogLevel; }"),
            Some("LogLevel".to_string())
        );
        assert_eq!(
            field_type("class A { map: Map<string,\n    number[]>; }"),
            Some("Map<string, number[]>".to_string())
        );
    }

    #[test]
    fn test_infer_literals() {
        assert_eq!(field_type("class A { a = 'x'; }"), Some("string".to_string()));
        assert_eq!(field_type("class A { a = 42; }"), Some("number".to_string()));
        assert_eq!(field_type("class A { a = -1; }"), Some("number".to_string()));
        assert_eq!(field_type("class A { a = false; }"), Some("boolean".to_string()));
        assert_eq!(field_type("class A { a = /x/; }"), Some("RegExp".to_string()));
    }

    #[test]
    fn test_infer_constructed_and_cast() {
        assert_eq!(
            field_type("class A { m = new Map<string, number>(); }"),
            Some("Map<string, number>".to_string())
        );
        assert_eq!(
            field_type("class A { c = load() as Config; }"),
            Some("Config".to_string())
        );
    }

    #[test]
    fn test_infer_arrays() {
        assert_eq!(field_type("class A { a = []; }"), Some("any[]".to_string()));
        assert_eq!(field_type("class A { a = [1, 2]; }"), Some("number[]".to_string()));
        assert_eq!(
            field_type("class A { a = [1, 'b']; }"),
            Some("(number | string)[]".to_string())
        );
        assert_eq!(field_type("class A { a = [load()]; }"), None);
    }

    #[test]
    fn test_uninitialized_is_any() {
        assert_eq!(field_type("class A { a; }"), Some("any".to_string()));
    }

    #[test]
    fn test_uninferable_initializer() {
        assert_eq!(field_type("class A { a = compute(); }"), None);
    }
}
