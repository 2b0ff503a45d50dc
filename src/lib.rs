pub mod ast;
pub mod config;
pub mod error;
pub mod flatten;
pub mod logging;
pub mod project;
pub mod types;

pub use ast::{AstAccess, NodeKind, ResolveRefs};
pub use config::FlattenConfig;
pub use error::{FlattenError, FlattenResult};
pub use flatten::Flattener;
pub use project::{Part, ProjectBuilder, ProjectModel};
pub use types::{DeclKind, FileId, NodeId, QualifiedName};
