//! In-memory project model
//!
//! A reference implementation of the two host contracts in [`crate::ast`]:
//! an arena of parse-tree nodes with parent/child links, per-file import
//! lists, and a name-resolution oracle driven by imports and package
//! visibility. The test suite is built on it, and embedders without their
//! own AST service can use it directly through [`ProjectBuilder`].
//!
//! Resolution is name-based, not type-based: a reference resolves to every
//! registered declaration with a matching simple name that is visible from
//! the referencing file (same file, same package, imported by exact
//! qualified name, or a member of an imported class). Overload sets
//! therefore come back as multiple candidates, which is exactly the shape
//! the flattener expects from a real host.

pub mod builder;

pub use builder::{Part, ProjectBuilder};

use std::collections::HashMap;

use crate::ast::{AstAccess, NodeKind, ResolveRefs};
use crate::{FileId, NodeId, QualifiedName};

#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) file: FileId,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    /// Full subtree text; computed bottom-up when the builder finalizes.
    pub(crate) text: Box<str>,
    pub(crate) qualified_name: Option<QualifiedName>,
}

#[derive(Debug)]
pub(crate) struct SourceFile {
    pub(crate) root: NodeId,
    #[allow(dead_code)]
    pub(crate) path: Box<str>,
    pub(crate) package: Option<QualifiedName>,
    pub(crate) imports: Vec<QualifiedName>,
}

/// A finalized, immutable project. Node and file ids are stable for the
/// lifetime of the model.
#[derive(Debug)]
pub struct ProjectModel {
    pub(crate) nodes: Vec<Node>,
    pub(crate) files: Vec<SourceFile>,
    /// Simple name -> declaration and constructor nodes, registration order.
    pub(crate) decl_index: HashMap<Box<str>, Vec<NodeId>>,
}

impl ProjectModel {
    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.value() as usize - 1]
    }

    fn file(&self, id: FileId) -> &SourceFile {
        &self.files[id.value() as usize - 1]
    }

    /// True when `decl` is visible from `from`: same file, same package,
    /// imported by exact qualified name, or enclosed in a declaration that
    /// is itself imported (a member of an imported class).
    fn is_visible(&self, decl: NodeId, from: FileId) -> bool {
        let decl_file = self.node(decl).file;
        if decl_file == from {
            return true;
        }
        if self.file(decl_file).package == self.file(from).package {
            return true;
        }
        let imports = &self.file(from).imports;
        let mut cursor = Some(decl);
        while let Some(node) = cursor {
            if let Some(name) = &self.node(node).qualified_name {
                if imports.contains(name) {
                    return true;
                }
            }
            cursor = self.node(node).parent;
        }
        false
    }
}

impl AstAccess for ProjectModel {
    fn kind(&self, node: NodeId) -> NodeKind {
        self.node(node).kind
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        &self.node(node).children
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).parent
    }

    fn text(&self, node: NodeId) -> &str {
        &self.node(node).text
    }

    fn qualified_name(&self, node: NodeId) -> Option<&QualifiedName> {
        self.node(node).qualified_name.as_ref()
    }

    fn owning_file(&self, node: NodeId) -> FileId {
        self.node(node).file
    }

    fn file_root(&self, file: FileId) -> Option<NodeId> {
        self.files.get(file.value() as usize - 1).map(|f| f.root)
    }

    fn imports(&self, file: FileId) -> &[QualifiedName] {
        &self.file(file).imports
    }
}

impl ResolveRefs for ProjectModel {
    fn resolve(&self, reference: NodeId) -> Vec<NodeId> {
        let node = self.node(reference);
        if node.kind != NodeKind::ReferenceExpression {
            return Vec::new();
        }
        let Some(candidates) = self.decl_index.get(node.text.as_ref()) else {
            return Vec::new();
        };
        candidates
            .iter()
            .copied()
            .filter(|&decl| self.is_visible(decl, node.file))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstAccess, NodeKind, ResolveRefs};

    fn find_reference(model: &ProjectModel, name: &str) -> NodeId {
        let id = model
            .nodes
            .iter()
            .position(|n| n.kind == NodeKind::ReferenceExpression && n.text.as_ref() == name)
            .expect("reference not found");
        NodeId::new(id as u32 + 1).unwrap()
    }

    #[test]
    fn test_resolve_same_file() {
        let mut builder = ProjectBuilder::new();
        let file = builder.file("A.kt", Some("com.acme"));
        builder.function(
            file,
            "com.acme.helper",
            vec![Part::code("fun helper() {}")],
        );
        builder.function(
            file,
            "com.acme.main",
            vec![Part::code("fun main() { "), Part::call("helper"), Part::code("() }")],
        );
        let model = builder.build();

        let reference = find_reference(&model, "helper");
        let resolved = model.resolve(reference);
        assert_eq!(resolved.len(), 1);
        assert_eq!(
            model.qualified_name(resolved[0]).unwrap().as_str(),
            "com.acme.helper"
        );
    }

    #[test]
    fn test_resolve_requires_visibility() {
        let mut builder = ProjectBuilder::new();
        let lib = builder.file("Lib.kt", Some("com.lib"));
        builder.function(lib, "com.lib.secret", vec![Part::code("fun secret() {}")]);

        let app = builder.file("App.kt", Some("com.app"));
        builder.function(
            app,
            "com.app.main",
            vec![Part::code("fun main() { "), Part::call("secret"), Part::code("() }")],
        );
        let model = builder.build();

        // Not imported, different package: unresolved.
        let reference = find_reference(&model, "secret");
        assert!(model.resolve(reference).is_empty());
    }

    #[test]
    fn test_resolve_through_import() {
        let mut builder = ProjectBuilder::new();
        let lib = builder.file("Lib.kt", Some("com.lib"));
        builder.function(lib, "com.lib.util", vec![Part::code("fun util() {}")]);

        let app = builder.file("App.kt", Some("com.app"));
        builder.import(app, "com.lib.util");
        builder.function(
            app,
            "com.app.main",
            vec![Part::code("fun main() { "), Part::call("util"), Part::code("() }")],
        );
        let model = builder.build();

        let reference = find_reference(&model, "util");
        assert_eq!(model.resolve(reference).len(), 1);
    }

    #[test]
    fn test_resolve_overloads_returns_all_candidates() {
        let mut builder = ProjectBuilder::new();
        let file = builder.file("A.kt", Some("com.acme"));
        builder.function(
            file,
            "com.acme.run",
            vec![Part::code("fun run() {}")],
        );
        builder.function(
            file,
            "com.acme.run",
            vec![Part::code("fun run(x: Int) {}")],
        );
        builder.function(
            file,
            "com.acme.main",
            vec![Part::code("fun main() { "), Part::call("run"), Part::code("() }")],
        );
        let model = builder.build();

        let reference = find_reference(&model, "run");
        assert_eq!(model.resolve(reference).len(), 2);
    }

    #[test]
    fn test_constructor_call_resolves_to_class_and_constructor() {
        let mut builder = ProjectBuilder::new();
        let file = builder.file("W.kt", Some("com.acme"));
        let class = builder.class_open(file, "com.acme.Widget");
        builder.parts(class, vec![Part::code("class Widget {")]);
        builder.constructor(class);
        builder.parts(class, vec![Part::code("}")]);

        let app = builder.file("App.kt", Some("com.app"));
        builder.import(app, "com.acme.Widget");
        builder.function(
            app,
            "com.app.main",
            vec![Part::code("fun main() { "), Part::call("Widget"), Part::code("() }")],
        );
        let model = builder.build();

        let reference = find_reference(&model, "Widget");
        let resolved = model.resolve(reference);
        assert_eq!(resolved.len(), 2);
        let kinds: Vec<NodeKind> = resolved.iter().map(|&n| model.kind(n)).collect();
        assert!(kinds.contains(&NodeKind::Class));
        assert!(kinds.contains(&NodeKind::Constructor));
    }

    #[test]
    fn test_subtree_text_is_concatenated() {
        let mut builder = ProjectBuilder::new();
        let file = builder.file("A.kt", Some("com.acme"));
        let decl = builder.function(
            file,
            "com.acme.twice",
            vec![
                Part::code("fun twice(x: Int) = "),
                Part::call_with("plus", vec![Part::code("(x, x)")]),
            ],
        );
        let model = builder.build();
        assert_eq!(model.text(decl), "fun twice(x: Int) = plus(x, x)");
    }
}
