//! Extractors for properties, parameters, functions, interfaces and enums.

use tree_sitter::Node;

use super::{logged, AccessorKind, Extractor};
use crate::error::{MapError, Result};
use crate::model::{
    EnumInfo, EnumMember, FunctionInfo, InterfaceInfo, PropertyInfo, ANY_TYPE, VOID_TYPE,
};
use crate::program::{ParsedFile, PrintMode};

impl Extractor<'_> {
    /// Extract a class property.
    ///
    /// The declared type wins; without one the provider infers it from the
    /// declaration.
    pub fn extract_property(&self, node: Node<'_>, file: &ParsedFile) -> Result<PropertyInfo> {
        logged("extract_property", node, file, self.property(node, file))
    }

    fn property(&self, node: Node<'_>, file: &ParsedFile) -> Result<PropertyInfo> {
        let name = self.declared_name(node, file).ok_or_else(|| {
            MapError::malformed("extract_property", node, &file.display_path(), "property has no name")
        })?;

        let type_name = match node.child_by_field_name("type") {
            Some(annotation) => self.provider.resolve_type(annotation, file),
            None => self.provider.infer_type(node, file),
        };

        Ok(PropertyInfo::new(name, type_name))
    }

    /// Extract the parameters of a function-like node, in order.
    ///
    /// Only annotated parameters get a type; nothing is inferred.
    pub fn extract_function_parameters(
        &self,
        node: Node<'_>,
        file: &ParsedFile,
    ) -> Result<Vec<PropertyInfo>> {
        logged(
            "extract_function_parameters",
            node,
            file,
            self.parameters(node, file),
        )
    }

    fn parameters(&self, node: Node<'_>, file: &ParsedFile) -> Result<Vec<PropertyInfo>> {
        // `x => x` has a single bare parameter.
        if let Some(param) = node.child_by_field_name("parameter") {
            return Ok(vec![PropertyInfo::new(file.node_text(param), None)]);
        }

        let Some(params) = node.child_by_field_name("parameters") else {
            return Ok(Vec::new());
        };

        let mut cursor = params.walk();
        let param_nodes: Vec<Node<'_>> = params
            .named_children(&mut cursor)
            .filter(|p| matches!(p.kind(), "required_parameter" | "optional_parameter"))
            .collect();

        param_nodes
            .into_iter()
            .map(|param| self.parameter(param, file))
            .collect()
    }

    fn parameter(&self, param: Node<'_>, file: &ParsedFile) -> Result<PropertyInfo> {
        let pattern = param.child_by_field_name("pattern").ok_or_else(|| {
            MapError::malformed(
                "extract_function_parameters",
                param,
                &file.display_path(),
                "parameter has no name",
            )
        })?;

        let name_node = match pattern.kind() {
            "rest_pattern" => pattern.named_child(0).unwrap_or(pattern),
            _ => pattern,
        };

        let type_name = param
            .child_by_field_name("type")
            .and_then(|annotation| self.provider.resolve_type(annotation, file));

        Ok(PropertyInfo::new(file.node_text(name_node), type_name))
    }

    /// Extract a named function or method.
    ///
    /// Returns `Ok(None)` for nodes without a name, such as anonymous
    /// function expressions.
    pub fn function_details(
        &self,
        node: Node<'_>,
        file: &ParsedFile,
    ) -> Result<Option<FunctionInfo>> {
        logged("function_details", node, file, self.function(node, file, None))
    }

    /// Extract a getter or setter as a function record.
    ///
    /// Getters have no parameters. Setters keep their parameter and return
    /// `void`.
    pub fn accessor_details(
        &self,
        node: Node<'_>,
        kind: AccessorKind,
        file: &ParsedFile,
    ) -> Result<Option<FunctionInfo>> {
        logged(
            "accessor_details",
            node,
            file,
            self.function(node, file, Some(kind)),
        )
    }

    fn function(
        &self,
        node: Node<'_>,
        file: &ParsedFile,
        accessor: Option<AccessorKind>,
    ) -> Result<Option<FunctionInfo>> {
        let Some(name) = self.declared_name(node, file) else {
            return Ok(None);
        };

        let content = self.provider.print(node, file, PrintMode::RemoveComments)?;
        let (parameters, return_type) = match accessor {
            Some(AccessorKind::Get) => (Vec::new(), self.return_type(node, file)),
            Some(AccessorKind::Set) => (
                self.extract_function_parameters(node, file)?,
                VOID_TYPE.to_string(),
            ),
            None => (
                self.extract_function_parameters(node, file)?,
                self.return_type(node, file),
            ),
        };

        let comments = self.comment(node, file);
        Ok(Some(FunctionInfo {
            name,
            content,
            parameters,
            return_type,
            comments: (!comments.is_empty()).then_some(comments),
        }))
    }

    /// Declared return type, or `any`.
    fn return_type(&self, node: Node<'_>, file: &ParsedFile) -> String {
        node.child_by_field_name("return_type")
            .and_then(|annotation| self.provider.resolve_type(annotation, file))
            .unwrap_or_else(|| ANY_TYPE.to_string())
    }

    /// Extract an interface's property signatures.
    ///
    /// Method, call, construct and index signatures are not properties and
    /// are left out. Untyped properties are `any`.
    pub fn extract_interface(&self, node: Node<'_>, file: &ParsedFile) -> Result<InterfaceInfo> {
        logged("extract_interface", node, file, self.interface(node, file))
    }

    fn interface(&self, node: Node<'_>, file: &ParsedFile) -> Result<InterfaceInfo> {
        let malformed = |at: Node<'_>, reason: &str| {
            MapError::malformed("extract_interface", at, &file.display_path(), reason)
        };

        let name = self
            .declared_name(node, file)
            .ok_or_else(|| malformed(node, "interface has no name"))?;
        let body = node
            .child_by_field_name("body")
            .ok_or_else(|| malformed(node, "interface has no body"))?;

        let mut cursor = body.walk();
        let signatures: Vec<Node<'_>> = body
            .named_children(&mut cursor)
            .filter(|member| member.kind() == "property_signature")
            .collect();

        let mut properties = Vec::with_capacity(signatures.len());
        for signature in signatures {
            let prop_name = self
                .declared_name(signature, file)
                .ok_or_else(|| malformed(signature, "property signature has no name"))?;
            let type_name = signature
                .child_by_field_name("type")
                .and_then(|annotation| self.provider.resolve_type(annotation, file))
                .unwrap_or_else(|| ANY_TYPE.to_string());
            properties.push(PropertyInfo::new(prop_name, Some(type_name)));
        }

        Ok(InterfaceInfo {
            name,
            properties,
            summary: self.summary(node, file),
        })
    }

    /// Extract an enum's members with their initializer text.
    pub fn extract_enum(&self, node: Node<'_>, file: &ParsedFile) -> Result<EnumInfo> {
        logged("extract_enum", node, file, self.enumeration(node, file))
    }

    fn enumeration(&self, node: Node<'_>, file: &ParsedFile) -> Result<EnumInfo> {
        let malformed = |at: Node<'_>, reason: &str| {
            MapError::malformed("extract_enum", at, &file.display_path(), reason)
        };

        let name = self
            .declared_name(node, file)
            .ok_or_else(|| malformed(node, "enum has no name"))?;
        let body = node
            .child_by_field_name("body")
            .ok_or_else(|| malformed(node, "enum has no body"))?;

        let mut members = Vec::new();
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            match member.kind() {
                "enum_assignment" => {
                    let member_name = self
                        .declared_name(member, file)
                        .ok_or_else(|| malformed(member, "enum member has no name"))?;
                    let value = member
                        .child_by_field_name("value")
                        .map(|v| file.node_text(v).to_string());
                    members.push(EnumMember {
                        name: member_name,
                        value,
                    });
                }
                "property_identifier" | "string" | "number" | "computed_property_name" => {
                    members.push(EnumMember {
                        name: file.node_text(member).to_string(),
                        value: None,
                    });
                }
                _ => {}
            }
        }

        Ok(EnumInfo {
            name,
            members,
            summary: self.summary(node, file),
        })
    }

    /// Documentation comment text attached to a node, or an empty string.
    pub fn comment(&self, node: Node<'_>, file: &ParsedFile) -> String {
        self.provider.doc_comment(node, file)
    }

    fn summary(&self, node: Node<'_>, file: &ParsedFile) -> Option<String> {
        let comment = self.comment(node, file);
        (!comment.is_empty()).then_some(comment)
    }
}
