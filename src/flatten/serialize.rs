//! Code serializer
//!
//! Renders the final flattened text in a fixed order: entry-file header,
//! retained imports, inlined declarations (pre-sorted by the closure
//! driver), a generated marker, then the entry file's own remaining
//! top-level code. Inlined bodies go through the comment-stripping rule;
//! non-declaration children of the entry file are copied verbatim.

use crate::ast::{AstAccess, NodeKind};
use crate::config::FlattenConfig;
use crate::{NodeId, QualifiedName};

/// Separates the inlined block from the entry file's own code.
const GENERATED_MARKER: &str = "// ---- flattened: original file body ----";

pub(crate) fn serialize<A: AstAccess>(
    ast: &A,
    entry_root: NodeId,
    keep_imports: &[QualifiedName],
    inline: &[NodeId],
    config: &FlattenConfig,
) -> String {
    let mut out = String::new();
    let mut block_emitted = false;

    for &child in ast.children(entry_root) {
        match ast.kind(child) {
            NodeKind::PackageDirective => continue,
            NodeKind::ImportList => {
                if !block_emitted {
                    emit_block(ast, &mut out, keep_imports, inline, config);
                    block_emitted = true;
                }
            }
            kind => {
                // A file without an import list still gets the block, right
                // before its first top-level content.
                if !block_emitted && !matches!(kind, NodeKind::Whitespace | NodeKind::Comment) {
                    emit_block(ast, &mut out, keep_imports, inline, config);
                    block_emitted = true;
                }
                if inline.contains(&child) {
                    continue;
                }
                if kind.is_declaration() {
                    strip_render(ast, child, &mut out);
                    out.push('\n');
                } else {
                    out.push_str(ast.text(child));
                }
            }
        }
    }
    if !block_emitted {
        emit_block(ast, &mut out, keep_imports, inline, config);
    }

    let trimmed = out.trim_matches('\n');
    trimmed.to_string()
}

fn emit_block<A: AstAccess>(
    ast: &A,
    out: &mut String,
    keep_imports: &[QualifiedName],
    inline: &[NodeId],
    config: &FlattenConfig,
) {
    for import in keep_imports {
        out.push_str(&config.import_keyword);
        out.push(' ');
        out.push_str(import.as_str());
        out.push('\n');
    }
    out.push('\n');
    for &decl in inline {
        strip_render(ast, decl, out);
        out.push('\n');
    }
    out.push('\n');
    out.push_str(GENERATED_MARKER);
    out.push('\n');
}

/// Render one declaration, dropping comment tokens and any leading
/// whitespace that precedes the first emitted code token. Interior spacing
/// is preserved verbatim, so the declaration keeps its original formatting
/// minus the comments.
fn strip_render<A: AstAccess>(ast: &A, decl: NodeId, out: &mut String) {
    let mut emitted_code = false;
    for &child in ast.children(decl) {
        match ast.kind(child) {
            NodeKind::Comment => continue,
            NodeKind::Whitespace => {
                if emitted_code {
                    out.push_str(ast.text(child));
                }
            }
            _ => {
                out.push_str(ast.text(child));
                emitted_code = true;
            }
        }
    }
}
