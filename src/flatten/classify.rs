//! Declaration normalization
//!
//! A raw resolved node is rarely the unit that gets inlined: constructors
//! belong to their class, methods and nested classes belong to their
//! top-level enclosing class. This module turns "a node the resolver
//! returned" into "the top-level declaration that owns it", or nothing.

use crate::NodeId;
use crate::ast::{AstAccess, NodeKind};

/// Normalize a resolved node to its owning top-level declaration.
///
/// - A top-level `Function`, `TypeAlias`, or `Class` is its own unit.
/// - A `Constructor`, a method, a nested class, or any other node climbs
///   to the nearest top-level `Class` ancestor.
/// - Anything without such an ancestor (e.g. a top-level property) is
///   discarded with `None`; the caller skips it silently.
pub fn owning_declaration<A: AstAccess>(ast: &A, resolved: NodeId) -> Option<NodeId> {
    match ast.kind(resolved) {
        NodeKind::Function | NodeKind::TypeAlias | NodeKind::Class
            if is_top_level(ast, resolved) =>
        {
            Some(resolved)
        }
        _ => enclosing_top_level_class(ast, resolved),
    }
}

fn is_top_level<A: AstAccess>(ast: &A, node: NodeId) -> bool {
    ast.parent(node)
        .is_some_and(|parent| ast.kind(parent) == NodeKind::File)
}

fn enclosing_top_level_class<A: AstAccess>(ast: &A, node: NodeId) -> Option<NodeId> {
    let mut cursor = ast.parent(node);
    while let Some(current) = cursor {
        if ast.kind(current) == NodeKind::Class && is_top_level(ast, current) {
            return Some(current);
        }
        cursor = ast.parent(current);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{Part, ProjectBuilder};

    #[test]
    fn test_top_level_function_is_its_own_unit() {
        let mut builder = ProjectBuilder::new();
        let file = builder.file("A.kt", Some("com.acme"));
        let decl = builder.function(file, "com.acme.f", vec![Part::code("fun f() {}")]);
        let model = builder.build();

        assert_eq!(owning_declaration(&model, decl), Some(decl));
    }

    #[test]
    fn test_constructor_normalizes_to_class() {
        let mut builder = ProjectBuilder::new();
        let file = builder.file("W.kt", Some("com.acme"));
        let class = builder.class_open(file, "com.acme.Widget");
        builder.parts(class, vec![Part::code("class Widget {")]);
        let ctor = builder.constructor(class);
        builder.parts(class, vec![Part::code("}")]);
        let model = builder.build();

        assert_eq!(owning_declaration(&model, ctor), Some(class));
    }

    #[test]
    fn test_method_normalizes_to_class() {
        let mut builder = ProjectBuilder::new();
        let file = builder.file("W.kt", Some("com.acme"));
        let class = builder.class_open(file, "com.acme.Widget");
        builder.parts(class, vec![Part::code("class Widget {\n")]);
        let method = builder.method(
            class,
            "com.acme.Widget.render",
            vec![Part::code("    fun render() {}\n")],
        );
        builder.parts(class, vec![Part::code("}")]);
        let model = builder.build();

        assert_eq!(owning_declaration(&model, method), Some(class));
    }

    #[test]
    fn test_top_level_property_is_discarded() {
        let mut builder = ProjectBuilder::new();
        let file = builder.file("A.kt", Some("com.acme"));
        let prop = builder.property(file, "com.acme.limit", vec![Part::code("val limit = 10")]);
        let model = builder.build();

        assert_eq!(owning_declaration(&model, prop), None);
    }
}
