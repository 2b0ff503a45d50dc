//! Host collaborator contracts
//!
//! The flattener never parses source text and never resolves a name by
//! itself. Both jobs belong to the embedding host (an IDE, a language
//! server, or the bundled in-memory [`crate::project::ProjectModel`]) and
//! are consumed through the two traits defined here.

use crate::{FileId, NodeId, QualifiedName};

/// Structural kind of a tree node as reported by the host.
///
/// The flattener only distinguishes the kinds it has to act on; everything
/// else a host grammar produces maps onto `Body` or `Token`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Root of a source file.
    File,
    /// The package/namespace header clause.
    PackageDirective,
    /// The import block; the walker never descends into it.
    ImportList,
    /// A single import statement inside an import list.
    ImportDirective,
    Class,
    Function,
    Property,
    TypeAlias,
    Constructor,
    /// A call; only its callee child is treated as the head resolution target.
    CallExpression,
    /// A name use in expression or type position.
    ReferenceExpression,
    /// Any other composite node.
    Body,
    /// A leaf carrying source text.
    Token,
    Whitespace,
    Comment,
}

impl NodeKind {
    /// True for kinds that can stand alone as an inlinable declaration.
    pub fn is_declaration(&self) -> bool {
        matches!(
            self,
            NodeKind::Class | NodeKind::Function | NodeKind::Property | NodeKind::TypeAlias
        )
    }
}

/// Read-only access to parse trees owned by the host.
///
/// Node handles are opaque; navigation, token text, and qualified names all
/// go through the host. Implementations must hand out stable `NodeId`s for
/// the lifetime of one flatten invocation.
pub trait AstAccess {
    /// Structural kind of `node`.
    fn kind(&self, node: NodeId) -> NodeKind;

    /// Direct children of `node`, in source order.
    fn children(&self, node: NodeId) -> &[NodeId];

    /// Parent of `node`, `None` for a file root.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Full source text of the subtree rooted at `node`.
    fn text(&self, node: NodeId) -> &str;

    /// Fully qualified name of `node`, if the host can compute one.
    /// Expected for declarations and constructors; optional elsewhere.
    fn qualified_name(&self, node: NodeId) -> Option<&QualifiedName>;

    /// The file a node belongs to.
    fn owning_file(&self, node: NodeId) -> FileId;

    /// Root node of a file, `None` if the host does not know the file.
    fn file_root(&self, file: FileId) -> Option<NodeId>;

    /// The file's declared imports as absolute qualified names, in source
    /// order. Harvested once per file when it joins the closure.
    fn imports(&self, file: FileId) -> &[QualifiedName];
}

/// The name-resolution oracle.
///
/// Given a reference node, returns every candidate declaration node it may
/// denote. Zero candidates means the reference is unresolved and is simply
/// skipped; more than one (overload sets, descriptor-based resolution) means
/// every candidate goes through classification independently.
pub trait ResolveRefs {
    fn resolve(&self, reference: NodeId) -> Vec<NodeId>;
}
