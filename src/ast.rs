//! Typed Go syntax model consumed by the extractor.
//!
//! The parser lowers the concrete tree into this closed set of node kinds.
//! Only the shapes the extractor inspects get their own variant; everything
//! else is kept as `Node::Other` with its children so a depth-first walk
//! still reaches nested calls.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
/// Source position, 1-based line and byte column.
pub struct Position {
    pub file: String,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(file: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// A parsed Go source file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: String,
    pub package: String,
    pub imports: Vec<ImportSpec>,
    pub decls: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Local name an import is bound to.
pub enum ImportName {
    /// No explicit name: the package's own name applies.
    Default,
    Alias(String),
    /// `import . "path"`
    Dot,
    /// `import _ "path"`
    Blank,
}

#[derive(Debug, Clone)]
pub struct ImportSpec {
    pub name: ImportName,
    /// Unquoted import path.
    pub path: String,
    pub pos: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LitKind {
    String,
    Int,
    Float,
    Rune,
    Imaginary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecKind {
    Var,
    Const,
    /// Short variable declaration (`a, b := x, y`).
    Define,
    /// Parameters, receivers, range and type-switch variables: names whose
    /// value is only known at run time. Never carries values.
    Bound,
}

#[derive(Debug, Clone)]
pub struct Ident {
    pub name: String,
    pub pos: Position,
}

#[derive(Debug, Clone)]
pub struct CallExpr {
    pub func: Box<Node>,
    pub args: Vec<Node>,
    pub pos: Position,
}

#[derive(Debug, Clone)]
pub struct SelectorExpr {
    pub operand: Box<Node>,
    pub field: Ident,
}

#[derive(Debug, Clone)]
pub struct BasicLit {
    pub kind: LitKind,
    /// Token text exactly as written, quotes included.
    pub raw: String,
    pub pos: Position,
}

#[derive(Debug, Clone)]
pub struct CompositeLit {
    pub ty: Option<Box<Node>>,
    pub elts: Vec<Node>,
    pub pos: Position,
}

#[derive(Debug, Clone)]
pub struct KeyValue {
    pub key: Box<Node>,
    pub value: Box<Node>,
}

#[derive(Debug, Clone)]
pub struct UnaryExpr {
    pub op: String,
    pub operand: Box<Node>,
}

#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub op: String,
    pub left: Box<Node>,
    pub right: Box<Node>,
}

#[derive(Debug, Clone)]
pub struct ValueSpec {
    pub kind: SpecKind,
    pub names: Vec<Ident>,
    pub values: Vec<Node>,
}

#[derive(Debug, Clone)]
pub struct OtherNode {
    /// Grammar node kind, kept for diagnostics only.
    pub kind: String,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone)]
pub enum Node {
    Call(CallExpr),
    Selector(SelectorExpr),
    Ident(Ident),
    BasicLit(BasicLit),
    Composite(CompositeLit),
    KeyValue(KeyValue),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    ValueSpec(ValueSpec),
    Other(OtherNode),
}

impl Node {
    /// Direct children in source order.
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::Call(c) => std::iter::once(c.func.as_ref()).chain(c.args.iter()).collect(),
            Node::Selector(s) => vec![s.operand.as_ref()],
            Node::Ident(_) | Node::BasicLit(_) => Vec::new(),
            Node::Composite(c) => c.ty.iter().map(|t| &**t).chain(c.elts.iter()).collect(),
            Node::KeyValue(kv) => vec![kv.key.as_ref(), kv.value.as_ref()],
            Node::Unary(u) => vec![u.operand.as_ref()],
            Node::Binary(b) => vec![b.left.as_ref(), b.right.as_ref()],
            Node::ValueSpec(v) => v.values.iter().collect(),
            Node::Other(o) => o.children.iter().collect(),
        }
    }

    pub fn as_ident(&self) -> Option<&Ident> {
        match self {
            Node::Ident(id) => Some(id),
            _ => None,
        }
    }

    /// Visit this node and all descendants depth-first, parents first.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Node)) {
        f(self);
        for child in self.children() {
            child.walk(f);
        }
    }
}

impl SourceFile {
    /// Visit every declaration subtree depth-first in source order.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Node)) {
        for decl in &self.decls {
            decl.walk(f);
        }
    }
}
