//! Go source parsing with tree-sitter.
//!
//! The concrete syntax tree is lowered into the typed model in `crate::ast`.
//! A tree containing error or missing nodes is rejected as a whole: the
//! extractor never sees a partially-recovered file.

use crate::ast::{
    BasicLit, BinaryExpr, CallExpr, CompositeLit, Ident, ImportName, ImportSpec, KeyValue, LitKind,
    Node, OtherNode, Position, SelectorExpr, SourceFile, SpecKind, UnaryExpr, ValueSpec,
};
use crate::error::ParseError;
use crate::resolve::unquote;
use std::fs;
use std::path::Path;
use tree_sitter::{Node as TsNode, Parser as TsParser};

const LOG_TARGET: &str = "promlinter::parser";

/// Reusable Go parser. Not shareable across threads; create one per worker.
pub struct GoParser {
    parser: TsParser,
}

impl GoParser {
    pub fn new() -> Self {
        Self {
            parser: TsParser::new(),
        }
    }

    /// Read and parse the file at `path`, attributing positions to `display`.
    pub fn parse_path(&mut self, path: &Path, display: &str) -> Result<SourceFile, ParseError> {
        let src = fs::read_to_string(path).map_err(|e| ParseError::unreadable(display, &e))?;
        self.parse_source(display, &src)
    }

    /// Parse in-memory source attributed to `path`.
    pub fn parse_source(&mut self, path: &str, src: &str) -> Result<SourceFile, ParseError> {
        self.parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .map_err(|e| ParseError {
                path: path.to_string(),
                line: 0,
                column: 0,
                message: format!("Go grammar unavailable: {e}"),
            })?;
        let tree = self.parser.parse(src, None).ok_or_else(|| ParseError {
            path: path.to_string(),
            line: 0,
            column: 0,
            message: "parser produced no tree".into(),
        })?;
        let root = tree.root_node();
        if root.has_error() {
            let bad = first_error(root).unwrap_or(root);
            let at = bad.start_position();
            let message = if bad.is_missing() {
                format!("missing {}", bad.kind())
            } else {
                "syntax error".to_string()
            };
            log::debug!(target: LOG_TARGET, "{path}: {message} at {}:{}", at.row + 1, at.column + 1);
            return Err(ParseError {
                path: path.to_string(),
                line: at.row + 1,
                column: at.column + 1,
                message,
            });
        }
        Lowerer {
            path,
            src: src.as_bytes(),
        }
        .source_file(root)
    }
}

impl Default for GoParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse `src` with a throwaway parser.
pub fn parse_source(path: &str, src: &str) -> Result<SourceFile, ParseError> {
    GoParser::new().parse_source(path, src)
}

fn first_error(node: TsNode<'_>) -> Option<TsNode<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<TsNode<'_>> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|c| c.has_error() || c.is_missing())
        .find_map(first_error)
}

struct Lowerer<'s> {
    path: &'s str,
    src: &'s [u8],
}

impl<'s> Lowerer<'s> {
    fn pos(&self, n: TsNode<'_>) -> Position {
        let p = n.start_position();
        Position::new(self.path, p.row + 1, p.column + 1)
    }

    fn text(&self, n: TsNode<'_>) -> &'s str {
        n.utf8_text(self.src).unwrap_or("")
    }

    fn named<'t>(&self, n: TsNode<'t>) -> Vec<TsNode<'t>> {
        let mut cursor = n.walk();
        n.named_children(&mut cursor)
            .filter(|c| !c.is_extra())
            .collect()
    }

    fn ident(&self, n: TsNode<'_>) -> Ident {
        Ident {
            name: self.text(n).to_string(),
            pos: self.pos(n),
        }
    }

    fn source_file(&self, root: TsNode<'_>) -> Result<SourceFile, ParseError> {
        let mut file = SourceFile {
            path: self.path.to_string(),
            package: String::new(),
            imports: Vec::new(),
            decls: Vec::new(),
        };
        for child in self.named(root) {
            match child.kind() {
                "package_clause" => {
                    if let Some(name) = self.named(child).first() {
                        file.package = self.text(*name).to_string();
                    }
                }
                "import_declaration" => self.imports(child, &mut file.imports)?,
                _ => file.decls.push(self.lower(child)),
            }
        }
        Ok(file)
    }

    fn imports(&self, n: TsNode<'_>, out: &mut Vec<ImportSpec>) -> Result<(), ParseError> {
        for child in self.named(n) {
            match child.kind() {
                "import_spec" => out.push(self.import_spec(child)?),
                "import_spec_list" => self.imports(child, out)?,
                _ => {}
            }
        }
        Ok(())
    }

    fn import_spec(&self, n: TsNode<'_>) -> Result<ImportSpec, ParseError> {
        let name = match n.child_by_field_name("name") {
            None => ImportName::Default,
            Some(nm) => match nm.kind() {
                "dot" => ImportName::Dot,
                "blank_identifier" => ImportName::Blank,
                _ => ImportName::Alias(self.text(nm).to_string()),
            },
        };
        let pos = self.pos(n);
        let raw = n
            .child_by_field_name("path")
            .map(|p| self.text(p))
            .unwrap_or("");
        let path = unquote(raw).map_err(|e| ParseError {
            path: self.path.to_string(),
            line: pos.line,
            column: pos.column,
            message: format!("bad import path: {e}"),
        })?;
        Ok(ImportSpec { name, path, pos })
    }

    /// Lower an `expression_list` (or any single expression) to its items.
    fn list(&self, n: Option<TsNode<'_>>) -> Vec<Node> {
        match n {
            None => Vec::new(),
            Some(n) if n.kind() == "expression_list" => {
                self.named(n).into_iter().map(|c| self.lower(c)).collect()
            }
            Some(n) => vec![self.lower(n)],
        }
    }

    fn boxed(&self, n: Option<TsNode<'_>>, parent: TsNode<'_>) -> Box<Node> {
        Box::new(match n {
            Some(n) => self.lower(n),
            None => self.other(parent, Vec::new()),
        })
    }

    fn other(&self, n: TsNode<'_>, children: Vec<Node>) -> Node {
        Node::Other(OtherNode {
            kind: n.kind().to_string(),
            children,
        })
    }

    fn lit(&self, n: TsNode<'_>, kind: LitKind) -> Node {
        Node::BasicLit(BasicLit {
            kind,
            raw: self.text(n).to_string(),
            pos: self.pos(n),
        })
    }

    fn lower(&self, n: TsNode<'_>) -> Node {
        match n.kind() {
            "identifier" | "field_identifier" | "package_identifier" | "type_identifier"
            | "blank_identifier" => Node::Ident(self.ident(n)),
            "interpreted_string_literal" | "raw_string_literal" => self.lit(n, LitKind::String),
            "int_literal" => self.lit(n, LitKind::Int),
            "float_literal" => self.lit(n, LitKind::Float),
            "imaginary_literal" => self.lit(n, LitKind::Imaginary),
            "rune_literal" => self.lit(n, LitKind::Rune),
            "call_expression" => Node::Call(CallExpr {
                func: self.boxed(n.child_by_field_name("function"), n),
                args: n
                    .child_by_field_name("arguments")
                    .map(|a| self.named(a).into_iter().map(|c| self.lower(c)).collect())
                    .unwrap_or_default(),
                pos: self.pos(n),
            }),
            "selector_expression" => match n.child_by_field_name("field") {
                Some(field) => Node::Selector(SelectorExpr {
                    operand: self.boxed(n.child_by_field_name("operand"), n),
                    field: self.ident(field),
                }),
                None => self.generic(n),
            },
            "qualified_type" => match n.child_by_field_name("name") {
                Some(name) => Node::Selector(SelectorExpr {
                    operand: self.boxed(n.child_by_field_name("package"), n),
                    field: self.ident(name),
                }),
                None => self.generic(n),
            },
            "composite_literal" => Node::Composite(CompositeLit {
                ty: n.child_by_field_name("type").map(|t| Box::new(self.lower(t))),
                elts: n
                    .child_by_field_name("body")
                    .map(|b| self.elements(b))
                    .unwrap_or_default(),
                pos: self.pos(n),
            }),
            "literal_value" => Node::Composite(CompositeLit {
                ty: None,
                elts: self.elements(n),
                pos: self.pos(n),
            }),
            "literal_element" | "parenthesized_expression" => {
                match self.named(n).into_iter().next() {
                    Some(inner) => self.lower(inner),
                    None => self.other(n, Vec::new()),
                }
            }
            "keyed_element" => {
                let parts = self.named(n);
                match (parts.first(), parts.last()) {
                    (Some(k), Some(v)) if parts.len() >= 2 => Node::KeyValue(KeyValue {
                        key: Box::new(self.lower(*k)),
                        value: Box::new(self.lower(*v)),
                    }),
                    _ => self.generic(n),
                }
            }
            "unary_expression" => Node::Unary(UnaryExpr {
                op: n
                    .child_by_field_name("operator")
                    .map(|o| self.text(o).to_string())
                    .unwrap_or_default(),
                operand: self.boxed(n.child_by_field_name("operand"), n),
            }),
            "binary_expression" => Node::Binary(BinaryExpr {
                op: n
                    .child_by_field_name("operator")
                    .map(|o| self.text(o).to_string())
                    .unwrap_or_default(),
                left: self.boxed(n.child_by_field_name("left"), n),
                right: self.boxed(n.child_by_field_name("right"), n),
            }),
            "var_spec" | "const_spec" => {
                let mut cursor = n.walk();
                let names = n
                    .children_by_field_name("name", &mut cursor)
                    .filter(|c| c.is_named())
                    .map(|c| self.ident(c))
                    .collect();
                Node::ValueSpec(ValueSpec {
                    kind: if n.kind() == "var_spec" {
                        SpecKind::Var
                    } else {
                        SpecKind::Const
                    },
                    names,
                    values: self.list(n.child_by_field_name("value")),
                })
            }
            "short_var_declaration" => {
                let names = self.bound_names(n.child_by_field_name("left"));
                Node::ValueSpec(ValueSpec {
                    kind: SpecKind::Define,
                    names,
                    values: self.list(n.child_by_field_name("right")),
                })
            }
            "parameter_declaration" | "variadic_parameter_declaration" => {
                let mut cursor = n.walk();
                let names = n
                    .children_by_field_name("name", &mut cursor)
                    .filter(|c| c.is_named())
                    .map(|c| self.ident(c))
                    .collect();
                self.bound(names)
            }
            "range_clause" | "receive_statement" => {
                let mut children = vec![self.bound(self.bound_names(n.child_by_field_name("left")))];
                if let Some(right) = n.child_by_field_name("right") {
                    children.push(self.lower(right));
                }
                self.other(n, children)
            }
            "type_switch_statement" => {
                let alias = self.bound(self.bound_names(n.child_by_field_name("alias")));
                let mut node = self.generic(n);
                if let Node::Other(o) = &mut node {
                    o.children.insert(0, alias);
                }
                node
            }
            _ => self.generic(n),
        }
    }

    fn bound(&self, names: Vec<Ident>) -> Node {
        Node::ValueSpec(ValueSpec {
            kind: SpecKind::Bound,
            names,
            values: Vec::new(),
        })
    }

    /// Identifiers on the left of `:=` / `=` in a range, receive or type switch.
    fn bound_names(&self, n: Option<TsNode<'_>>) -> Vec<Ident> {
        self.list(n)
            .into_iter()
            .filter_map(|l| match l {
                Node::Ident(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    fn elements(&self, body: TsNode<'_>) -> Vec<Node> {
        self.named(body).into_iter().map(|c| self.lower(c)).collect()
    }

    fn generic(&self, n: TsNode<'_>) -> Node {
        let children = self.named(n).into_iter().map(|c| self.lower(c)).collect();
        self.other(n, children)
    }
}
