//! Single-file dependency-closure flattening.
//!
//! [`Flattener`] ties the pieces together: the reference walker discovers
//! uses, the classifier normalizes resolved nodes to owning declarations,
//! the closure driver runs both to a fixed point, and the serializer
//! renders the result. One invocation is synchronous, run-to-completion,
//! and leaves no state behind.

pub mod classify;
pub mod closure;
pub mod serialize;
pub mod walker;

use tracing::info;

use crate::FileId;
use crate::ast::{AstAccess, ResolveRefs};
use crate::config::FlattenConfig;
use crate::error::FlattenResult;
use crate::flatten::closure::Closure;

/// Flattens one entry file into a self-contained text unit.
///
/// The host supplies tree access and name resolution; the configuration
/// supplies the allow-list of namespaces that stay imports. The flattener
/// itself performs no I/O: the returned string is handed back to the
/// caller for delivery.
pub struct Flattener<'a, A, R> {
    ast: &'a A,
    resolver: &'a R,
    config: &'a FlattenConfig,
}

impl<'a, A, R> Flattener<'a, A, R>
where
    A: AstAccess,
    R: ResolveRefs,
{
    pub fn new(ast: &'a A, resolver: &'a R, config: &'a FlattenConfig) -> Self {
        Self {
            ast,
            resolver,
            config,
        }
    }

    /// Compute the dependency closure of `entry` and render the flattened
    /// unit: retained imports, inlined declarations sorted by qualified
    /// name, then the entry file's remaining top-level code.
    pub fn flatten(&self, entry: FileId) -> FlattenResult<String> {
        let outcome = Closure::new(
            self.ast,
            self.resolver,
            entry,
            &self.config.keep_namespaces,
            self.config.max_nodes,
        )
        .run()?;

        let entry_root = self
            .ast
            .file_root(entry)
            .ok_or(crate::error::FlattenError::EntryFileUnknown)?;
        let text = serialize::serialize(
            self.ast,
            entry_root,
            &outcome.keep_imports,
            &outcome.inline,
            self.config,
        );
        info!(
            entry = entry.value(),
            keep = outcome.keep_imports.len(),
            inline = outcome.inline.len(),
            bytes = text.len(),
            "flatten complete"
        );
        Ok(text)
    }
}
