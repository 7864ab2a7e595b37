//! Routing of child declarations into their class or module.

use tracing::debug;
use tree_sitter::Node;

use super::{logged, Extractor};
use crate::error::Result;
use crate::model::{ClassInfo, EnumInfo, FunctionInfo, InterfaceInfo, ModuleInfo, PropertyInfo};
use crate::program::ParsedFile;

/// Whether an accessor reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorKind {
    Get,
    Set,
}

/// What a child node is, as far as aggregation cares.
///
/// `export` and `declare` wrappers are already unwrapped, so the node
/// carried is the declaration itself.
#[derive(Debug, Clone, Copy)]
pub enum NodeCategory<'t> {
    Function(Node<'t>),
    Property(Node<'t>),
    Accessor(Node<'t>, AccessorKind),
    Interface(Node<'t>),
    Enum(Node<'t>),
    Class(Node<'t>),
    Other,
}

/// Classify a class or module child.
///
/// Constructors, statements and variable declarations are `Other`.
pub fn classify<'t>(node: Node<'t>, file: &ParsedFile) -> NodeCategory<'t> {
    match node.kind() {
        "export_statement" => node
            .child_by_field_name("declaration")
            .or_else(|| node.child_by_field_name("value"))
            .map(|inner| classify(inner, file))
            .unwrap_or(NodeCategory::Other),
        // `declare global { }` and `declare module 'x' { }` have no declaration child.
        "ambient_declaration" => {
            let mut cursor = node.walk();
            let category = node
                .named_children(&mut cursor)
                .map(|inner| classify(inner, file))
                .find(|category| !matches!(category, NodeCategory::Other))
                .unwrap_or(NodeCategory::Other);
            category
        }
        "method_definition" | "method_signature" | "abstract_method_signature" => {
            match accessor_kind(node) {
                Some(kind) => NodeCategory::Accessor(node, kind),
                None if is_constructor(node, file) => NodeCategory::Other,
                None => NodeCategory::Function(node),
            }
        }
        "function_declaration"
        | "generator_function_declaration"
        | "function_signature"
        | "function_expression"
        | "function"
        | "generator_function"
        | "arrow_function" => NodeCategory::Function(node),
        "public_field_definition" | "field_definition" => NodeCategory::Property(node),
        "interface_declaration" => NodeCategory::Interface(node),
        "enum_declaration" => NodeCategory::Enum(node),
        "class_declaration" | "abstract_class_declaration" | "class" => NodeCategory::Class(node),
        _ => NodeCategory::Other,
    }
}

/// `get`/`set` keyword of a method, if it has one.
fn accessor_kind(node: Node<'_>) -> Option<AccessorKind> {
    // A method named `get` has a property_identifier name, not a `get` token.
    let mut cursor = node.walk();
    let kind = node.children(&mut cursor).find_map(|child| match child.kind() {
        "get" => Some(AccessorKind::Get),
        "set" => Some(AccessorKind::Set),
        _ => None,
    });
    kind
}

fn is_constructor(node: Node<'_>, file: &ParsedFile) -> bool {
    node.child_by_field_name("name")
        .map(|name| matches!(file.node_text(name), "constructor" | "\"constructor\"" | "'constructor'"))
        .unwrap_or(false)
}

/// A record ready to be appended to a container.
#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Function(FunctionInfo),
    Property(PropertyInfo),
    Interface(InterfaceInfo),
    Enum(EnumInfo),
    Class(ClassInfo),
}

impl Member {
    fn label(&self) -> &'static str {
        match self {
            Member::Function(_) => "function",
            Member::Property(_) => "property",
            Member::Interface(_) => "interface",
            Member::Enum(_) => "enum",
            Member::Class(_) => "class",
        }
    }
}

/// Something declarations can be appended to.
pub trait Container {
    fn append(&mut self, member: Member);
}

impl Container for ClassInfo {
    fn append(&mut self, member: Member) {
        match member {
            Member::Function(f) => self.functions.push(f),
            Member::Property(p) => self.properties.push(p),
            Member::Interface(i) => self.interfaces.push(i),
            Member::Enum(e) => self.enums.push(e),
            other @ Member::Class(_) => {
                debug!(member = other.label(), "classes do not hold nested classes");
            }
        }
    }
}

impl Container for ModuleInfo {
    fn append(&mut self, member: Member) {
        match member {
            Member::Function(f) => self.functions.push(f),
            Member::Interface(i) => self.interfaces.push(i),
            Member::Enum(e) => self.enums.push(e),
            Member::Class(c) => self.classes.push(c),
            other @ Member::Property(_) => {
                debug!(member = other.label(), "modules do not hold properties");
            }
        }
    }
}

impl Extractor<'_> {
    /// Extract a child node into a member, or `None` if it is not recorded.
    pub fn extract_member(&self, node: Node<'_>, file: &ParsedFile) -> Result<Option<Member>> {
        let member = match classify(node, file) {
            NodeCategory::Function(n) => self.function_details(n, file)?.map(Member::Function),
            NodeCategory::Accessor(n, kind) => {
                self.accessor_details(n, kind, file)?.map(Member::Function)
            }
            NodeCategory::Property(n) => Some(Member::Property(self.extract_property(n, file)?)),
            NodeCategory::Interface(n) => Some(Member::Interface(self.extract_interface(n, file)?)),
            NodeCategory::Enum(n) => Some(Member::Enum(self.extract_enum(n, file)?)),
            NodeCategory::Class(n) => Some(Member::Class(self.extract_class(n, file)?)),
            NodeCategory::Other => None,
        };
        Ok(member)
    }

    /// Extract one child and append it to `container`.
    pub fn aggregate<C: Container + ?Sized>(
        &self,
        container: &mut C,
        node: Node<'_>,
        file: &ParsedFile,
    ) -> Result<()> {
        if let Some(member) = self.extract_member(node, file)? {
            container.append(member);
        }
        Ok(())
    }

    /// Extract a class and its direct members.
    pub fn extract_class(&self, node: Node<'_>, file: &ParsedFile) -> Result<ClassInfo> {
        logged("extract_class", node, file, self.class(node, file))
    }

    fn class(&self, node: Node<'_>, file: &ParsedFile) -> Result<ClassInfo> {
        let mut class = ClassInfo::new(self.declared_name(node, file));
        if let Some(body) = node.child_by_field_name("body") {
            let mut cursor = body.walk();
            for member in body.named_children(&mut cursor) {
                self.aggregate(&mut class, member, file)?;
            }
        }
        Ok(class)
    }

    /// Extract a whole source file into a module.
    ///
    /// `dependencies` come from the dependency graph builder and are stored
    /// as given.
    pub fn extract_module(
        &self,
        file: &ParsedFile,
        path: impl Into<String>,
        dependencies: Vec<String>,
    ) -> Result<ModuleInfo> {
        let root = file.root();
        let mut module = ModuleInfo::new(path, dependencies);
        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            self.aggregate(&mut module, child, file)?;
        }
        debug!(
            module = %module.path,
            classes = module.classes.len(),
            functions = module.functions.len(),
            interfaces = module.interfaces.len(),
            enums = module.enums.len(),
            "extracted module"
        );
        Ok(module)
    }
}
