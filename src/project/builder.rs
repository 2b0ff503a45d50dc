//! Fluent construction of [`ProjectModel`] fixtures.
//!
//! Declarations are described as a flat list of [`Part`]s: literal code
//! tokens, whitespace, comments, bare references, and call expressions.
//! Each part becomes one direct child of the declaration node, which is the
//! granularity the serializer's comment-stripping rule operates on.

use super::{Node, ProjectModel, SourceFile};
use crate::ast::NodeKind;
use crate::{DeclKind, FileId, NodeId, QualifiedName};

/// One building block of a declaration body or top-level code run.
#[derive(Debug, Clone)]
pub enum Part {
    /// Literal source text.
    Code(String),
    /// A whitespace token.
    Whitespace(String),
    /// A comment token; stripped from inlined output.
    Comment(String),
    /// A name use in expression or type position.
    Ref(String),
    /// A call whose callee is the named reference; arguments nest as parts.
    Call { callee: String, args: Vec<Part> },
}

impl Part {
    pub fn code(text: impl Into<String>) -> Self {
        Part::Code(text.into())
    }

    pub fn ws(text: impl Into<String>) -> Self {
        Part::Whitespace(text.into())
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Part::Comment(text.into())
    }

    pub fn reference(name: impl Into<String>) -> Self {
        Part::Ref(name.into())
    }

    pub fn call(callee: impl Into<String>) -> Self {
        Part::Call {
            callee: callee.into(),
            args: Vec::new(),
        }
    }

    pub fn call_with(callee: impl Into<String>, args: Vec<Part>) -> Self {
        Part::Call {
            callee: callee.into(),
            args,
        }
    }
}

struct FileBuild {
    path: Box<str>,
    package: Option<QualifiedName>,
    imports: Vec<QualifiedName>,
    top_level: Vec<NodeId>,
}

/// Builds an immutable [`ProjectModel`].
pub struct ProjectBuilder {
    nodes: Vec<Node>,
    files: Vec<FileBuild>,
    decl_index: Vec<(Box<str>, NodeId)>,
}

impl ProjectBuilder {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            files: Vec::new(),
            decl_index: Vec::new(),
        }
    }

    /// Register a source file. Order of registration fixes its `FileId`.
    pub fn file(&mut self, path: &str, package: Option<&str>) -> FileId {
        self.files.push(FileBuild {
            path: path.into(),
            package: package.map(QualifiedName::from),
            imports: Vec::new(),
            top_level: Vec::new(),
        });
        FileId::new(self.files.len() as u32).expect("file ids start at 1")
    }

    /// Add an import directive (absolute qualified name) to a file.
    pub fn import(&mut self, file: FileId, qualified: &str) {
        self.files[file.value() as usize - 1]
            .imports
            .push(QualifiedName::from(qualified));
    }

    /// Add a top-level declaration built from `parts`.
    pub fn declaration(
        &mut self,
        file: FileId,
        kind: DeclKind,
        qualified: &str,
        parts: Vec<Part>,
    ) -> NodeId {
        let node_kind = match kind {
            DeclKind::Class => NodeKind::Class,
            DeclKind::Function => NodeKind::Function,
            DeclKind::Property => NodeKind::Property,
            DeclKind::TypeAlias => NodeKind::TypeAlias,
        };
        let name = QualifiedName::from(qualified);
        let decl = self.alloc(node_kind, file, None, Some(name.clone()));
        self.register(&name, decl);
        self.files[file.value() as usize - 1].top_level.push(decl);
        self.add_parts(decl, parts);
        decl
    }

    pub fn function(&mut self, file: FileId, qualified: &str, parts: Vec<Part>) -> NodeId {
        self.declaration(file, DeclKind::Function, qualified, parts)
    }

    pub fn property(&mut self, file: FileId, qualified: &str, parts: Vec<Part>) -> NodeId {
        self.declaration(file, DeclKind::Property, qualified, parts)
    }

    pub fn type_alias(&mut self, file: FileId, qualified: &str, parts: Vec<Part>) -> NodeId {
        self.declaration(file, DeclKind::TypeAlias, qualified, parts)
    }

    pub fn class(&mut self, file: FileId, qualified: &str, parts: Vec<Part>) -> NodeId {
        self.declaration(file, DeclKind::Class, qualified, parts)
    }

    /// Open a class whose members are added incrementally with [`Self::parts`],
    /// [`Self::method`], and [`Self::constructor`]. Children render in the
    /// order they are added.
    pub fn class_open(&mut self, file: FileId, qualified: &str) -> NodeId {
        self.declaration(file, DeclKind::Class, qualified, Vec::new())
    }

    /// Append body parts to an already-open declaration.
    pub fn parts(&mut self, decl: NodeId, parts: Vec<Part>) {
        self.add_parts(decl, parts);
    }

    /// Add a method to an open class. Methods resolve by name like any other
    /// declaration but normalize to their owning class when classified.
    pub fn method(&mut self, class: NodeId, qualified: &str, parts: Vec<Part>) -> NodeId {
        let file = self.nodes[class.value() as usize - 1].file;
        let name = QualifiedName::from(qualified);
        let method = self.alloc(NodeKind::Function, file, Some(class), Some(name.clone()));
        self.register(&name, method);
        self.attach(class, method);
        self.add_parts(method, parts);
        method
    }

    /// Add a constructor to an open class, registered under the class's
    /// simple name so that constructor calls resolve to it.
    pub fn constructor(&mut self, class: NodeId) -> NodeId {
        let class_node = &self.nodes[class.value() as usize - 1];
        let file = class_node.file;
        let name = class_node
            .qualified_name
            .clone()
            .expect("class declarations always carry a qualified name");
        let ctor = self.alloc(NodeKind::Constructor, file, Some(class), Some(name.clone()));
        self.register(&name, ctor);
        self.attach(class, ctor);
        ctor
    }

    /// Add a run of top-level executable code (not a declaration).
    pub fn top_level_code(&mut self, file: FileId, parts: Vec<Part>) -> NodeId {
        let body = self.alloc(NodeKind::Body, file, None, None);
        self.files[file.value() as usize - 1].top_level.push(body);
        self.add_parts(body, parts);
        body
    }

    /// Finalize: assemble file roots, compute subtree texts, freeze.
    pub fn build(mut self) -> ProjectModel {
        let mut files = Vec::with_capacity(self.files.len());
        let file_builds = std::mem::take(&mut self.files);
        for (idx, fb) in file_builds.into_iter().enumerate() {
            let file_id = FileId::new(idx as u32 + 1).expect("file ids start at 1");
            let root = self.alloc(NodeKind::File, file_id, None, None);

            if let Some(package) = &fb.package {
                let directive = self.alloc(NodeKind::PackageDirective, file_id, Some(root), None);
                self.nodes[directive.value() as usize - 1].text =
                    format!("package {package}\n\n").into();
                self.attach(root, directive);
            }
            if !fb.imports.is_empty() {
                let list = self.alloc(NodeKind::ImportList, file_id, Some(root), None);
                for import in &fb.imports {
                    let directive =
                        self.alloc(NodeKind::ImportDirective, file_id, Some(list), None);
                    self.nodes[directive.value() as usize - 1].text =
                        format!("import {import}\n").into();
                    self.attach(list, directive);
                }
                self.attach(root, list);
            }
            for &top in &fb.top_level {
                self.nodes[top.value() as usize - 1].parent = Some(root);
                self.attach(root, top);
            }

            files.push(SourceFile {
                root,
                path: fb.path,
                package: fb.package,
                imports: fb.imports,
            });
            finalize_text(&mut self.nodes, root);
        }

        let mut decl_index: std::collections::HashMap<Box<str>, Vec<NodeId>> =
            std::collections::HashMap::new();
        for (name, id) in self.decl_index {
            decl_index.entry(name).or_default().push(id);
        }

        ProjectModel {
            nodes: self.nodes,
            files,
            decl_index,
        }
    }

    fn alloc(
        &mut self,
        kind: NodeKind,
        file: FileId,
        parent: Option<NodeId>,
        qualified_name: Option<QualifiedName>,
    ) -> NodeId {
        self.nodes.push(Node {
            kind,
            file,
            parent,
            children: Vec::new(),
            text: Box::from(""),
            qualified_name,
        });
        NodeId::new(self.nodes.len() as u32).expect("node ids start at 1")
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.value() as usize - 1].children.push(child);
    }

    fn register(&mut self, name: &QualifiedName, decl: NodeId) {
        self.decl_index.push((name.simple_name().into(), decl));
    }

    fn add_parts(&mut self, parent: NodeId, parts: Vec<Part>) {
        let file = self.nodes[parent.value() as usize - 1].file;
        for part in parts {
            match part {
                Part::Code(text) => {
                    let token = self.alloc(NodeKind::Token, file, Some(parent), None);
                    self.nodes[token.value() as usize - 1].text = text.into();
                    self.attach(parent, token);
                }
                Part::Whitespace(text) => {
                    let token = self.alloc(NodeKind::Whitespace, file, Some(parent), None);
                    self.nodes[token.value() as usize - 1].text = text.into();
                    self.attach(parent, token);
                }
                Part::Comment(text) => {
                    let token = self.alloc(NodeKind::Comment, file, Some(parent), None);
                    self.nodes[token.value() as usize - 1].text = text.into();
                    self.attach(parent, token);
                }
                Part::Ref(name) => {
                    let reference =
                        self.alloc(NodeKind::ReferenceExpression, file, Some(parent), None);
                    self.nodes[reference.value() as usize - 1].text = name.into();
                    self.attach(parent, reference);
                }
                Part::Call { callee, args } => {
                    let call = self.alloc(NodeKind::CallExpression, file, Some(parent), None);
                    let callee_ref =
                        self.alloc(NodeKind::ReferenceExpression, file, Some(call), None);
                    self.nodes[callee_ref.value() as usize - 1].text = callee.into();
                    self.attach(call, callee_ref);
                    self.add_parts(call, args);
                    self.attach(parent, call);
                }
            }
        }
    }
}

impl Default for ProjectBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute subtree text bottom-up; leaves keep the text they were built with.
fn finalize_text(nodes: &mut [Node], id: NodeId) {
    let children = nodes[id.value() as usize - 1].children.clone();
    if children.is_empty() {
        return;
    }
    let mut text = String::new();
    for child in children {
        finalize_text(nodes, child);
        text.push_str(&nodes[child.value() as usize - 1].text);
    }
    nodes[id.value() as usize - 1].text = text.into();
}
