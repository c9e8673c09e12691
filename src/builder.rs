//! Descriptor assembly from resolved option components.

use crate::ast::{CompositeLit, LitKind, Node, Position};
use crate::error::UnquoteError;
use crate::models::{ConstLabel, MetricDescriptor, MetricType};
use crate::resolve::{unquote, Resolver};

const LOG_TARGET: &str = "promlinter::builder";

/// Join name components with `_`, skipping empty ones.
///
/// An empty `name` yields an empty result regardless of the other parts.
pub fn build_fq_name(namespace: &str, subsystem: &str, name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }
    [namespace, subsystem, name]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("_")
}

#[derive(Debug, Clone, Copy)]
/// Where the fully-qualified name comes from.
pub enum FqNameExpr<'a> {
    /// A single expression holding the whole name.
    Whole(&'a Node),
    /// Separate components; an absent component is empty.
    Parts {
        namespace: Option<&'a Node>,
        subsystem: Option<&'a Node>,
        name: Option<&'a Node>,
    },
}

#[derive(Debug, Clone, Copy)]
/// Unresolved inputs of one descriptor.
pub struct DescParts<'a> {
    pub fq_name: FqNameExpr<'a>,
    pub help: Option<&'a Node>,
    pub variable_labels: Option<&'a Node>,
    pub const_labels: Option<&'a Node>,
}

impl<'a> DescParts<'a> {
    /// Pick the known fields out of an options literal. Unkeyed or
    /// non-identifier keyed elements are ignored.
    pub fn from_opts(lit: &'a CompositeLit, variable_labels: Option<&'a Node>) -> Self {
        let (mut namespace, mut subsystem, mut name) = (None, None, None);
        let mut help = None;
        let mut const_labels = None;
        for elt in &lit.elts {
            let Node::KeyValue(kv) = elt else { continue };
            let Some(key) = kv.key.as_ident() else { continue };
            let value = Some(kv.value.as_ref());
            match key.name.as_str() {
                "Namespace" => namespace = value,
                "Subsystem" => subsystem = value,
                "Name" => name = value,
                "Help" => help = value,
                "ConstLabels" => const_labels = value,
                _ => {}
            }
        }
        Self {
            fq_name: FqNameExpr::Parts {
                namespace,
                subsystem,
                name,
            },
            help,
            variable_labels,
            const_labels,
        }
    }
}

/// Assembles descriptors through one file's resolver.
pub struct DescriptorBuilder<'r, 't, 'a> {
    resolver: &'r Resolver<'t, 'a>,
}

impl<'r, 't, 'a> DescriptorBuilder<'r, 't, 'a> {
    pub fn new(resolver: &'r Resolver<'t, 'a>) -> Self {
        Self { resolver }
    }

    /// The composite literal behind `node`: written inline, behind `&`, or
    /// one identifier hop away.
    pub fn composite(&self, node: &'a Node) -> Option<&'a CompositeLit> {
        match self.resolver.table().deref(node)? {
            Node::Composite(lit) => Some(lit),
            Node::Unary(u) if u.op == "&" => match u.operand.as_ref() {
                Node::Composite(lit) => Some(lit),
                _ => None,
            },
            _ => None,
        }
    }

    /// Build a descriptor, or `None` when the name is not fully known.
    pub fn build(
        &self,
        metric_type: MetricType,
        position: &Position,
        parts: DescParts<'a>,
    ) -> Result<Option<MetricDescriptor>, UnquoteError> {
        let Some(fq_name) = self.fq_name(parts.fq_name)? else {
            log::trace!(target: LOG_TARGET, "{position}: name not statically known");
            return Ok(None);
        };
        if fq_name.is_empty() {
            log::trace!(target: LOG_TARGET, "{position}: empty metric name");
            return Ok(None);
        }
        let help = match parts.help {
            Some(h) => self.resolver.string(h)?.known(),
            None => None,
        };
        let variable_labels = match parts.variable_labels {
            Some(l) => self.label_names(l)?,
            None => Vec::new(),
        };
        let const_labels = match parts.const_labels {
            Some(c) => self.const_labels(c)?,
            None => Vec::new(),
        };
        Ok(Some(MetricDescriptor {
            metric_type,
            fq_name,
            help,
            position: position.clone(),
            variable_labels,
            const_labels,
        }))
    }

    fn fq_name(&self, expr: FqNameExpr<'a>) -> Result<Option<String>, UnquoteError> {
        match expr {
            FqNameExpr::Whole(n) => Ok(self.resolver.string(n)?.known()),
            FqNameExpr::Parts {
                namespace,
                subsystem,
                name,
            } => {
                let Some(name) = self.component(name)? else {
                    return Ok(None);
                };
                let Some(namespace) = self.component(namespace)? else {
                    return Ok(None);
                };
                let Some(subsystem) = self.component(subsystem)? else {
                    return Ok(None);
                };
                Ok(Some(build_fq_name(&namespace, &subsystem, &name)))
            }
        }
    }

    fn component(&self, node: Option<&'a Node>) -> Result<Option<String>, UnquoteError> {
        match node {
            None => Ok(Some(String::new())),
            Some(n) => Ok(self.resolver.string(n)?.known()),
        }
    }

    fn label_names(&self, node: &'a Node) -> Result<Vec<String>, UnquoteError> {
        let Some(lit) = self.composite(node) else {
            return Ok(Vec::new());
        };
        lit.elts
            .iter()
            .map(|e| self.resolver.label_value(e))
            .collect()
    }

    fn const_labels(&self, node: &'a Node) -> Result<Vec<ConstLabel>, UnquoteError> {
        let Some(lit) = self.composite(node) else {
            return Ok(Vec::new());
        };
        let mut out = Vec::new();
        for elt in &lit.elts {
            let Node::KeyValue(kv) = elt else { continue };
            let key = match kv.key.as_ref() {
                Node::BasicLit(key) if key.kind == LitKind::String => key,
                _ => {
                    log::trace!(target: LOG_TARGET, "skipping constant label with non-string key");
                    continue;
                }
            };
            out.push(ConstLabel {
                name: unquote(&key.raw)?,
                value: self.resolver.string(&kv.value)?.known(),
            });
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::build::*;
    use crate::ast::{BasicLit, SourceFile};
    use crate::resolve::IdentTable;

    fn file(decls: Vec<Node>) -> SourceFile {
        SourceFile {
            path: "test.go".into(),
            package: "test".into(),
            imports: Vec::new(),
            decls,
        }
    }

    fn lit(node: &Node) -> &CompositeLit {
        match node {
            Node::Composite(c) => c,
            _ => panic!("not a composite"),
        }
    }

    #[test]
    fn test_build_fq_name() {
        assert_eq!(build_fq_name("ns", "sub", "name"), "ns_sub_name");
        assert_eq!(build_fq_name("ns", "", "name"), "ns_name");
        assert_eq!(build_fq_name("", "sub", "name"), "sub_name");
        assert_eq!(build_fq_name("", "", "name"), "name");
        assert_eq!(build_fq_name("ns", "sub", ""), "");
    }

    #[test]
    fn test_opts_with_all_components() {
        let f = file(vec![var("ns", string("app"))]);
        let table = IdentTable::build(&f);
        let r = Resolver::new(&table);
        let b = DescriptorBuilder::new(&r);
        let opts = composite(vec![
            kv(ident("Namespace"), ident("ns")),
            kv(ident("Subsystem"), string("http")),
            kv(ident("Name"), string("requests_total")),
            kv(ident("Help"), string("Requests.")),
        ]);
        let labels = composite(vec![string("code"), string("method")]);
        let m = b
            .build(
                MetricType::Counter,
                &pos(),
                DescParts::from_opts(lit(&opts), Some(&labels)),
            )
            .unwrap()
            .unwrap();
        assert_eq!(m.fq_name, "app_http_requests_total");
        assert_eq!(m.help.as_deref(), Some("Requests."));
        assert_eq!(m.variable_labels, vec!["code", "method"]);
    }

    #[test]
    fn test_unresolved_namespace_drops_descriptor() {
        let f = file(Vec::new());
        let table = IdentTable::build(&f);
        let r = Resolver::new(&table);
        let b = DescriptorBuilder::new(&r);
        let opts = composite(vec![
            kv(ident("Namespace"), call(ident("ns"), Vec::new())),
            kv(ident("Name"), string("x_total")),
        ]);
        let out = b
            .build(MetricType::Counter, &pos(), DescParts::from_opts(lit(&opts), None))
            .unwrap();
        assert!(out.is_none());
    }

    #[test]
    fn test_unresolved_help_is_absent_not_fatal() {
        let f = file(Vec::new());
        let table = IdentTable::build(&f);
        let r = Resolver::new(&table);
        let b = DescriptorBuilder::new(&r);
        let opts = composite(vec![
            kv(ident("Name"), string("x_total")),
            kv(ident("Help"), ident("someHelp")),
        ]);
        let m = b
            .build(MetricType::Counter, &pos(), DescParts::from_opts(lit(&opts), None))
            .unwrap()
            .unwrap();
        assert_eq!(m.help, None);
    }

    #[test]
    fn test_const_labels_keep_order_and_placeholder() {
        let f = file(Vec::new());
        let table = IdentTable::build(&f);
        let r = Resolver::new(&table);
        let b = DescriptorBuilder::new(&r);
        let consts = composite(vec![
            kv(string("k1"), string("v1")),
            kv(string("k2"), ident("dynamic")),
        ]);
        let opts = composite(vec![
            kv(ident("Name"), string("up")),
            kv(ident("ConstLabels"), consts),
        ]);
        let m = b
            .build(MetricType::Gauge, &pos(), DescParts::from_opts(lit(&opts), None))
            .unwrap()
            .unwrap();
        assert_eq!(m.labels(), vec!["k1=v1", "k2=?"]);
    }

    #[test]
    fn test_const_labels_skip_non_string_keys() {
        let f = file(Vec::new());
        let table = IdentTable::build(&f);
        let r = Resolver::new(&table);
        let b = DescriptorBuilder::new(&r);
        let int_key = Node::BasicLit(BasicLit {
            kind: LitKind::Int,
            raw: "1".into(),
            pos: pos(),
        });
        let consts = composite(vec![
            kv(int_key, string("v")),
            kv(ident("key"), string("w")),
            kv(string("env"), string("prod")),
        ]);
        let opts = composite(vec![
            kv(ident("Name"), string("up")),
            kv(ident("ConstLabels"), consts),
        ]);
        let m = b
            .build(MetricType::Gauge, &pos(), DescParts::from_opts(lit(&opts), None))
            .unwrap()
            .unwrap();
        assert_eq!(m.labels(), vec!["env=prod"]);
    }
}
