//! Static resolution of string values.
//!
//! A value is statically known when it is a string literal, or an identifier
//! whose single declaration initializes it directly with one. Anything else
//! (concatenation, calls, selectors into other packages, longer identifier
//! chains) is unresolved and the caller decides what to do about it.

use crate::ast::{LitKind, Node, SourceFile};
use crate::error::UnquoteError;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy)]
/// What an identifier is bound to within one file.
pub enum Binding<'a> {
    /// Exactly one declaration with exactly one initializer.
    Init(&'a Node),
    /// Declared without an initializer, declared more than once, bound at
    /// run time (parameter, receiver, range, receive or type-switch
    /// variable), or initialized from a multi-value expression.
    Unresolved,
}

/// Per-file identifier table built in a single pre-pass.
#[derive(Debug, Default)]
pub struct IdentTable<'a> {
    bindings: HashMap<&'a str, Binding<'a>>,
}

impl<'a> IdentTable<'a> {
    pub fn build(file: &'a SourceFile) -> Self {
        let mut table = Self::default();
        file.walk(&mut |n| {
            if let Node::ValueSpec(spec) = n {
                let matched = spec.names.len() == spec.values.len();
                for (i, name) in spec.names.iter().enumerate() {
                    if name.name == "_" {
                        continue;
                    }
                    let binding = match (matched, spec.values.get(i)) {
                        (true, Some(v)) => Binding::Init(v),
                        _ => Binding::Unresolved,
                    };
                    table.insert(&name.name, binding);
                }
            }
        });
        table
    }

    fn insert(&mut self, name: &'a str, binding: Binding<'a>) {
        self.bindings
            .entry(name)
            .and_modify(|b| *b = Binding::Unresolved)
            .or_insert(binding);
    }

    pub fn lookup(&self, name: &str) -> Option<Binding<'a>> {
        self.bindings.get(name).copied()
    }

    /// Follow one identifier hop. Non-identifiers are returned unchanged.
    pub fn deref(&self, node: &'a Node) -> Option<&'a Node> {
        match node {
            Node::Ident(id) => match self.lookup(&id.name)? {
                Binding::Init(init) => Some(init),
                Binding::Unresolved => None,
            },
            other => Some(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Outcome of resolving one value expression.
pub enum Resolved {
    Known(String),
    Unknown,
}

impl Resolved {
    pub fn known(self) -> Option<String> {
        match self {
            Resolved::Known(s) => Some(s),
            Resolved::Unknown => None,
        }
    }
}

/// Resolves expressions against one file's identifier table.
#[derive(Debug)]
pub struct Resolver<'t, 'a> {
    table: &'t IdentTable<'a>,
}

impl<'t, 'a> Resolver<'t, 'a> {
    pub fn new(table: &'t IdentTable<'a>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'t IdentTable<'a> {
        self.table
    }

    /// Resolve `node` to a string, following at most one identifier hop.
    ///
    /// Errors only when a string token itself is malformed.
    pub fn string(&self, node: &'a Node) -> Result<Resolved, UnquoteError> {
        self.string_at(node, 0)
    }

    fn string_at(&self, node: &'a Node, hops: u8) -> Result<Resolved, UnquoteError> {
        match node {
            Node::BasicLit(lit) if lit.kind == LitKind::String => {
                unquote(&lit.raw).map(Resolved::Known)
            }
            Node::Ident(id) if hops == 0 => match self.table.lookup(&id.name) {
                Some(Binding::Init(init)) => self.string_at(init, hops + 1),
                _ => Ok(Resolved::Unknown),
            },
            _ => Ok(Resolved::Unknown),
        }
    }

    /// Resolve a label value, substituting `?` when unknown.
    pub fn label_value(&self, node: &'a Node) -> Result<String, UnquoteError> {
        Ok(self.string(node)?.known().unwrap_or_else(|| "?".to_string()))
    }
}

/// Unquote a Go string literal token (interpreted or raw).
pub fn unquote(raw: &str) -> Result<String, UnquoteError> {
    if raw.len() >= 2 && raw.starts_with('`') && raw.ends_with('`') {
        let body = &raw[1..raw.len() - 1];
        if body.contains('`') {
            return Err(UnquoteError::Unterminated(raw.to_string()));
        }
        return Ok(body.replace('\r', ""));
    }
    if raw.len() < 2 || !raw.starts_with('"') || !raw.ends_with('"') {
        return Err(UnquoteError::NotQuoted(raw.to_string()));
    }
    let body = &raw[1..raw.len() - 1];
    let mut out: Vec<u8> = Vec::with_capacity(body.len());
    let mut chars = body.chars();
    let bad_escape = || UnquoteError::InvalidEscape(raw.to_string());
    while let Some(c) = chars.next() {
        match c {
            '"' | '\n' => return Err(UnquoteError::Unterminated(raw.to_string())),
            '\\' => {
                let e = chars.next().ok_or_else(bad_escape)?;
                match e {
                    'a' => out.push(0x07),
                    'b' => out.push(0x08),
                    'f' => out.push(0x0c),
                    'n' => out.push(b'\n'),
                    'r' => out.push(b'\r'),
                    't' => out.push(b'\t'),
                    'v' => out.push(0x0b),
                    '\\' => out.push(b'\\'),
                    '"' => out.push(b'"'),
                    'x' => out.push(hex_digits(&mut chars, 2).ok_or_else(bad_escape)? as u8),
                    'u' | 'U' => {
                        let n = if e == 'u' { 4 } else { 8 };
                        let cp = hex_digits(&mut chars, n).ok_or_else(bad_escape)?;
                        let ch = char::from_u32(cp).ok_or_else(bad_escape)?;
                        let mut buf = [0u8; 4];
                        out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
                    }
                    '0'..='7' => {
                        let mut v = e.to_digit(8).unwrap_or(0);
                        for _ in 0..2 {
                            let d = chars.next().and_then(|d| d.to_digit(8)).ok_or_else(bad_escape)?;
                            v = v * 8 + d;
                        }
                        if v > 255 {
                            return Err(bad_escape());
                        }
                        out.push(v as u8);
                    }
                    _ => return Err(bad_escape()),
                }
            }
            _ => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }
    }
    // \x and octal escapes may produce bytes that are not valid UTF-8.
    Ok(String::from_utf8(out).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned()))
}

fn hex_digits(chars: &mut std::str::Chars<'_>, n: usize) -> Option<u32> {
    let mut v = 0u32;
    for _ in 0..n {
        v = v * 16 + chars.next()?.to_digit(16)?;
    }
    Some(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::build::*;
    use crate::ast::{BasicLit, Position, SourceFile};

    fn file(decls: Vec<Node>) -> SourceFile {
        SourceFile {
            path: "test.go".into(),
            package: "test".into(),
            imports: Vec::new(),
            decls,
        }
    }

    #[test]
    fn test_unquote_interpreted_and_raw() {
        assert_eq!(unquote(r#""foo_total""#).unwrap(), "foo_total");
        assert_eq!(unquote(r#""a\tb\"c\\""#).unwrap(), "a\tb\"c\\");
        assert_eq!(unquote(r#""é\x41\101""#).unwrap(), "éAA");
        assert_eq!(unquote("`raw\\n\r text`").unwrap(), "raw\\n text");
    }

    #[test]
    fn test_unquote_rejects_malformed_tokens() {
        assert!(matches!(unquote("foo"), Err(UnquoteError::NotQuoted(_))));
        assert!(matches!(unquote(r#""bad\q""#), Err(UnquoteError::InvalidEscape(_))));
        assert!(matches!(unquote(r#""a"b""#), Err(UnquoteError::Unterminated(_))));
        assert!(matches!(unquote(r#""\x4""#), Err(UnquoteError::InvalidEscape(_))));
    }

    #[test]
    fn test_identifier_resolves_one_hop() {
        let f = file(vec![var("name", string("requests_total"))]);
        let table = IdentTable::build(&f);
        let r = Resolver::new(&table);
        let node = ident("name");
        assert_eq!(r.string(&node).unwrap(), Resolved::Known("requests_total".into()));
    }

    #[test]
    fn test_identifier_chain_is_not_followed() {
        let f = file(vec![var("a", string("x")), var("b", ident("a"))]);
        let table = IdentTable::build(&f);
        let r = Resolver::new(&table);
        let node = ident("b");
        assert_eq!(r.string(&node).unwrap(), Resolved::Unknown);
    }

    #[test]
    fn test_duplicate_declaration_is_unresolved() {
        let f = file(vec![var("a", string("x")), var("a", string("y"))]);
        let table = IdentTable::build(&f);
        assert!(matches!(table.lookup("a"), Some(Binding::Unresolved)));
    }

    #[test]
    fn test_other_shapes_unresolved() {
        let f = file(Vec::new());
        let table = IdentTable::build(&f);
        let r = Resolver::new(&table);
        let concat = Node::Binary(crate::ast::BinaryExpr {
            op: "+".into(),
            left: Box::new(string("a")),
            right: Box::new(string("b")),
        });
        let call_node = call(ident("name"), Vec::new());
        let int = Node::BasicLit(BasicLit {
            kind: LitKind::Int,
            raw: "1".into(),
            pos: Position::new("test.go", 1, 1),
        });
        assert_eq!(r.string(&concat).unwrap(), Resolved::Unknown);
        assert_eq!(r.string(&call_node).unwrap(), Resolved::Unknown);
        assert_eq!(r.string(&int).unwrap(), Resolved::Unknown);
        let missing = ident("missing");
        assert_eq!(r.string(&missing).unwrap(), Resolved::Unknown);
        assert_eq!(r.label_value(&missing).unwrap(), "?");
    }
}
