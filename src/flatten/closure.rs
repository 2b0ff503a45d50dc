//! Closure fixed-point driver
//!
//! Orchestrates the dependency-closure computation: a scan queue feeds the
//! reference walker, a classify queue sorts each discovered declaration
//! into keep / inline / uncertain, and a final double-check pass settles
//! the uncertain ones once the set of known imports is complete.
//!
//! Termination is guaranteed by the visited set: every declaration passes
//! through discovery at most once, so cyclic reference graphs (mutual
//! recursion, circular type aliases) cannot loop.

use indexmap::IndexSet;
use std::collections::VecDeque;
use tracing::{debug, trace};

use crate::ast::{AstAccess, ResolveRefs};
use crate::error::{FlattenError, FlattenResult};
use crate::flatten::classify::owning_declaration;
use crate::flatten::walker::walk;
use crate::{FileId, NodeId, QualifiedName};

/// Final classification of the closure, ready for serialization.
pub(crate) struct ClosureOutcome {
    /// Retained import names, sorted ascending.
    pub keep_imports: Vec<QualifiedName>,
    /// Declarations to inline, sorted ascending by qualified name so the
    /// output never depends on discovery order.
    pub inline: Vec<NodeId>,
}

pub(crate) struct Closure<'a, A, R> {
    ast: &'a A,
    resolver: &'a R,
    entry: FileId,
    keep_namespaces: &'a [String],
    max_nodes: usize,

    /// Every declaration ever discovered; the termination invariant.
    visited: IndexSet<NodeId>,
    /// Union of import names across every file in the closure. Only grows.
    known_imports: IndexSet<QualifiedName>,
    /// Files whose imports have been (or are queued to be) harvested.
    file_set: IndexSet<FileId>,
    file_queue: VecDeque<FileId>,
    /// Units whose bodies still need the reference walker.
    scan_queue: VecDeque<NodeId>,
    /// Freshly discovered declarations awaiting classification (LIFO, so a
    /// declaration's own dependents are classified before siblings).
    classify_queue: Vec<NodeId>,

    keep_imports: IndexSet<QualifiedName>,
    inline: IndexSet<NodeId>,
    uncertain: Vec<NodeId>,
    /// Files owning at least one confirmed-inline declaration, entry file
    /// excluded. Drives the double-check promotion.
    ref_files: IndexSet<FileId>,
}

impl<'a, A, R> Closure<'a, A, R>
where
    A: AstAccess,
    R: ResolveRefs,
{
    pub(crate) fn new(
        ast: &'a A,
        resolver: &'a R,
        entry: FileId,
        keep_namespaces: &'a [String],
        max_nodes: usize,
    ) -> Self {
        Self {
            ast,
            resolver,
            entry,
            keep_namespaces,
            max_nodes,
            visited: IndexSet::new(),
            known_imports: IndexSet::new(),
            file_set: IndexSet::new(),
            file_queue: VecDeque::new(),
            scan_queue: VecDeque::new(),
            classify_queue: Vec::new(),
            keep_imports: IndexSet::new(),
            inline: IndexSet::new(),
            uncertain: Vec::new(),
            ref_files: IndexSet::new(),
        }
    }

    pub(crate) fn run(mut self) -> FlattenResult<ClosureOutcome> {
        let entry_root = self
            .ast
            .file_root(self.entry)
            .ok_or(FlattenError::EntryFileUnknown)?;

        self.file_set.insert(self.entry);
        self.merge_imports(self.entry);
        self.scan_queue.push_back(entry_root);

        // Fixed point: scan, harvest imports, classify, repeat.
        while let Some(unit) = self.scan_queue.pop_front() {
            let ast = self.ast;
            let resolver = self.resolver;
            let mut discovered = Vec::new();
            walk(ast, resolver, unit, &mut |resolved| discovered.push(resolved));
            for resolved in discovered {
                self.discover(resolved)?;
            }

            while let Some(file) = self.file_queue.pop_front() {
                self.merge_imports(file);
            }

            while let Some(pending) = self.classify_queue.pop() {
                self.classify(pending);
            }
        }

        self.double_check();

        let ast = self.ast;
        let mut keep_imports: Vec<QualifiedName> = self.keep_imports.into_iter().collect();
        keep_imports.sort();

        let mut inline: Vec<NodeId> = self.inline.into_iter().collect();
        inline.sort_by(|&a, &b| {
            let left = ast.qualified_name(a).map(QualifiedName::as_str);
            let right = ast.qualified_name(b).map(QualifiedName::as_str);
            left.cmp(&right)
        });

        debug!(
            keep = keep_imports.len(),
            inline = inline.len(),
            "closure complete"
        );
        Ok(ClosureOutcome {
            keep_imports,
            inline,
        })
    }

    /// First-sight bookkeeping for a resolved node: normalize it to its
    /// owning declaration, then enqueue the declaration for scanning and
    /// classification, and its file for import harvesting.
    fn discover(&mut self, resolved: NodeId) -> FlattenResult<()> {
        let Some(decl) = owning_declaration(self.ast, resolved) else {
            trace!(?resolved, "resolved node has no owning declaration");
            return Ok(());
        };
        if !self.visited.insert(decl) {
            return Ok(());
        }
        if self.visited.len() > self.max_nodes {
            return Err(FlattenError::BudgetExceeded {
                limit: self.max_nodes,
            });
        }

        self.scan_queue.push_back(decl);
        self.classify_queue.push(decl);

        let file = self.ast.owning_file(decl);
        if self.file_set.insert(file) {
            self.file_queue.push_back(file);
        }
        Ok(())
    }

    fn merge_imports(&mut self, file: FileId) {
        for import in self.ast.imports(file) {
            self.known_imports.insert(import.clone());
        }
    }

    /// Sort one pending declaration into keep / inline / uncertain.
    fn classify(&mut self, decl: NodeId) {
        let Some(name) = self.ast.qualified_name(decl) else {
            trace!(?decl, "declaration without a qualified name, dropped");
            return;
        };
        if self.known_imports.contains(name) {
            self.settle_imported(decl);
        } else {
            self.uncertain.push(decl);
        }
    }

    /// Classification for a declaration whose name is a known import:
    /// allow-listed names stay imports, everything else is inlined.
    fn settle_imported(&mut self, decl: NodeId) {
        let Some(name) = self.ast.qualified_name(decl) else {
            return;
        };
        if self
            .keep_namespaces
            .iter()
            .any(|prefix| name.starts_with_namespace(prefix))
        {
            trace!(%name, "keep as import");
            self.keep_imports.insert(name.clone());
        } else {
            trace!(%name, "inline");
            self.inline.insert(decl);
            let file = self.ast.owning_file(decl);
            if file != self.entry {
                self.ref_files.insert(file);
            }
        }
    }

    /// Second pass over uncertain declarations, run once both queues are
    /// empty and KnownImports has reached its final value.
    ///
    /// First every uncertain element is re-tested against the complete
    /// import set (a declaration classified before its importing file
    /// joined the closure is revisited here, never dropped). Survivors are
    /// then promoted iff their owning file already supplies a confirmed
    /// inline declaration; the rest is same-package-looking noise with no
    /// confirmed reference path and is discarded.
    fn double_check(&mut self) {
        let pending = std::mem::take(&mut self.uncertain);
        let mut unimported = Vec::new();
        for decl in pending {
            let Some(name) = self.ast.qualified_name(decl) else {
                continue;
            };
            if self.known_imports.contains(name) {
                self.settle_imported(decl);
            } else {
                unimported.push(decl);
            }
        }
        for decl in unimported {
            let file = self.ast.owning_file(decl);
            if self.ref_files.contains(&file) {
                debug!(?decl, "promoted via same-file inline evidence");
                self.inline.insert(decl);
            } else {
                trace!(?decl, "uncertain declaration dropped");
            }
        }
    }
}
