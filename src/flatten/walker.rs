//! Reference walker
//!
//! Depth-first traversal of a subtree that reports every resolved reference
//! target to a callback. Import lists are skipped here; they are harvested
//! separately by the closure driver and must not count as uses.

use crate::NodeId;
use crate::ast::{AstAccess, NodeKind, ResolveRefs};

/// Visit every descendant of `root`, invoking `on_resolved` once per
/// candidate the resolver returns for each reference encountered.
///
/// For a call expression only the callee child is treated as the head
/// resolution target; arguments are still visited as ordinary expressions,
/// so their own references fire the callback too. The tree is never mutated.
pub fn walk<A, R, F>(ast: &A, resolver: &R, root: NodeId, on_resolved: &mut F)
where
    A: AstAccess,
    R: ResolveRefs,
    F: FnMut(NodeId),
{
    match ast.kind(root) {
        NodeKind::ImportList => {}
        NodeKind::CallExpression => {
            if let Some(&callee) = ast.children(root).first() {
                if ast.kind(callee) == NodeKind::ReferenceExpression {
                    for candidate in resolver.resolve(callee) {
                        on_resolved(candidate);
                    }
                }
            }
            // Arguments (and the callee's own subtree) are still ordinary
            // expressions; duplicates are deduplicated downstream.
            for &child in ast.children(root) {
                walk(ast, resolver, child, on_resolved);
            }
        }
        NodeKind::ReferenceExpression => {
            for candidate in resolver.resolve(root) {
                on_resolved(candidate);
            }
            for &child in ast.children(root) {
                walk(ast, resolver, child, on_resolved);
            }
        }
        _ => {
            for &child in ast.children(root) {
                walk(ast, resolver, child, on_resolved);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{Part, ProjectBuilder};

    #[test]
    fn test_walk_reports_call_and_argument_references() {
        let mut builder = ProjectBuilder::new();
        let file = builder.file("A.kt", Some("com.acme"));
        builder.function(file, "com.acme.helper", vec![Part::code("fun helper() {}")]);
        builder.function(file, "com.acme.size", vec![Part::code("fun size() = 0")]);
        builder.function(
            file,
            "com.acme.main",
            vec![
                Part::code("fun main() { "),
                Part::call_with("helper", vec![Part::code("("), Part::call("size"), Part::code("())")]),
                Part::code(" }"),
            ],
        );
        let model = builder.build();

        let root = crate::ast::AstAccess::file_root(&model, file).unwrap();
        let mut resolved = Vec::new();
        walk(&model, &model, root, &mut |node| resolved.push(node));

        let names: Vec<&str> = resolved
            .iter()
            .map(|&n| {
                crate::ast::AstAccess::qualified_name(&model, n)
                    .unwrap()
                    .as_str()
            })
            .collect();
        assert!(names.contains(&"com.acme.helper"));
        assert!(names.contains(&"com.acme.size"));
    }

    #[test]
    fn test_walk_skips_import_list() {
        let mut builder = ProjectBuilder::new();
        let lib = builder.file("Lib.kt", Some("com.lib"));
        builder.function(lib, "com.lib.util", vec![Part::code("fun util() {}")]);

        let app = builder.file("App.kt", Some("com.app"));
        builder.import(app, "com.lib.util");
        builder.top_level_code(app, vec![Part::code("val unused = 1")]);
        let model = builder.build();

        // The import of com.lib.util must not count as a use.
        let root = crate::ast::AstAccess::file_root(&model, app).unwrap();
        let mut resolved = Vec::new();
        walk(&model, &model, root, &mut |node| resolved.push(node));
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_unresolved_references_are_skipped() {
        let mut builder = ProjectBuilder::new();
        let file = builder.file("A.kt", Some("com.acme"));
        builder.function(
            file,
            "com.acme.main",
            vec![Part::code("fun main() { "), Part::call("nowhere"), Part::code("() }")],
        );
        let model = builder.build();

        let root = crate::ast::AstAccess::file_root(&model, file).unwrap();
        let mut count = 0usize;
        walk(&model, &model, root, &mut |_| count += 1);
        assert_eq!(count, 0);
    }
}
