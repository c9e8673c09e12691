//! Call-shape matching over a file's syntax tree.
//!
//! Recognized shapes, given the file's import binding:
//! - `prometheus.NewCounterVec(opts, ...)`: direct client call.
//! - `promauto.NewCounterVec(opts, ...)`: factory call.
//! - `promauto.With(reg).NewCounterVec(opts, ...)`: factory bound to a registry.
//! - `NewCounterVec(opts, ...)` / `With(reg).NewCounterVec(...)`: dot imports.
//! - `prometheus.MustNewConstMetric(prometheus.NewDesc(...), prometheus.GaugeValue, ...)`
//!   and the histogram/summary variants.
//!
//! Anything else is not a metric declaration and is walked through.

use crate::ast::{CallExpr, Node, SourceFile};
use crate::builder::{DescParts, DescriptorBuilder, FqNameExpr};
use crate::error::ExtractError;
use crate::imports::ImportBinding;
use crate::models::{MetricDescriptor, MetricType};
use crate::resolve::{IdentTable, Resolver};
use std::collections::HashMap;

const LOG_TARGET: &str = "promlinter::matcher";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConstKind {
    /// Type taken from the value-type argument.
    ByValueType,
    Fixed(MetricType),
}

/// Fixed constructor-name tables, built once and shared read-only.
#[derive(Debug, Clone)]
pub struct ConstructorTable {
    opts: HashMap<&'static str, MetricType>,
    consts: HashMap<&'static str, ConstKind>,
}

impl ConstructorTable {
    pub fn standard() -> Self {
        let opts = [
            ("NewCounter", MetricType::Counter),
            ("NewCounterVec", MetricType::Counter),
            ("NewCounterFunc", MetricType::Counter),
            ("NewGauge", MetricType::Gauge),
            ("NewGaugeVec", MetricType::Gauge),
            ("NewGaugeFunc", MetricType::Gauge),
            ("NewHistogram", MetricType::Histogram),
            ("NewHistogramVec", MetricType::Histogram),
            ("NewSummary", MetricType::Summary),
            ("NewSummaryVec", MetricType::Summary),
        ]
        .into_iter()
        .collect();
        let consts = [
            ("MustNewConstMetric", ConstKind::ByValueType),
            ("NewConstMetric", ConstKind::ByValueType),
            ("MustNewConstHistogram", ConstKind::Fixed(MetricType::Histogram)),
            ("NewConstHistogram", ConstKind::Fixed(MetricType::Histogram)),
            ("MustNewConstSummary", ConstKind::Fixed(MetricType::Summary)),
            ("NewConstSummary", ConstKind::Fixed(MetricType::Summary)),
        ]
        .into_iter()
        .collect();
        Self { opts, consts }
    }

    pub fn opts_type(&self, ctor: &str) -> Option<MetricType> {
        self.opts.get(ctor).copied()
    }
}

impl Default for ConstructorTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Client,
    Factory,
    FactoryWith,
    Unqualified,
}

struct Matcher<'m, 'a> {
    constructors: &'m ConstructorTable,
    binding: &'m ImportBinding,
    builder: DescriptorBuilder<'m, 'm, 'a>,
    idents: &'m IdentTable<'a>,
}

impl<'m, 'a> Matcher<'m, 'a> {
    fn walk(&self, node: &'a Node, out: &mut Vec<MetricDescriptor>) -> Result<(), ExtractError> {
        if let Node::Call(call) = node {
            if let Some(m) = self.visit(call)? {
                out.push(m);
            }
        }
        for child in node.children() {
            self.walk(child, out)?;
        }
        Ok(())
    }

    /// Classify the callee; returns the constructor name and the shape.
    fn classify(&self, call: &'a CallExpr) -> Option<(&'a str, Shape)> {
        match call.func.as_ref() {
            Node::Selector(sel) => {
                let shape = match sel.operand.as_ref() {
                    Node::Ident(q) if self.binding.client.qualifies(&q.name) => Shape::Client,
                    Node::Ident(q) if self.binding.factory.qualifies(&q.name) => Shape::Factory,
                    Node::Call(inner) if self.is_with_call(inner) => Shape::FactoryWith,
                    _ => return None,
                };
                Some((sel.field.name.as_str(), shape))
            }
            Node::Ident(id) if self.binding.any_dot() => Some((id.name.as_str(), Shape::Unqualified)),
            _ => None,
        }
    }

    fn is_with_call(&self, inner: &CallExpr) -> bool {
        match inner.func.as_ref() {
            Node::Ident(id) => id.name == "With" && self.binding.factory.dot,
            Node::Selector(sel) => {
                sel.field.name == "With"
                    && matches!(sel.operand.as_ref(),
                        Node::Ident(q) if self.binding.factory.qualifies(&q.name))
            }
            _ => false,
        }
    }

    /// `node` names `name` exported by the client library.
    fn is_client_ref(&self, node: &Node, name: &str) -> bool {
        match node {
            Node::Selector(sel) => {
                sel.field.name == name
                    && matches!(sel.operand.as_ref(),
                        Node::Ident(q) if self.binding.client.qualifies(&q.name))
            }
            Node::Ident(id) => id.name == name && self.binding.client.dot,
            _ => false,
        }
    }

    fn visit(&self, call: &'a CallExpr) -> Result<Option<MetricDescriptor>, ExtractError> {
        let Some((ctor, shape)) = self.classify(call) else {
            return Ok(None);
        };
        let parts = if let Some(metric_type) = self.constructors.opts_type(ctor) {
            self.opts_parts(call, ctor).map(|p| (metric_type, p))
        } else if let Some(kind) = self.constructors.consts.get(ctor).copied() {
            let client_shape = shape == Shape::Client
                || (shape == Shape::Unqualified && self.binding.client.dot);
            if !client_shape {
                return Ok(None);
            }
            self.const_parts(call, kind)
        } else {
            return Ok(None);
        };
        let Some((metric_type, parts)) = parts else {
            log::trace!(target: LOG_TARGET, "{}: {ctor} options not statically known", call.pos);
            return Ok(None);
        };
        log::debug!(target: LOG_TARGET, "{}: {shape:?} call to {ctor}", call.pos);
        self.builder
            .build(metric_type, &call.pos, parts)
            .map_err(|source| ExtractError::MalformedLiteral {
                pos: call.pos.clone(),
                source,
            })
    }

    fn opts_parts(&self, call: &'a CallExpr, ctor: &str) -> Option<DescParts<'a>> {
        let lit = self.builder.composite(call.args.first()?)?;
        let labels = if ctor.ends_with("Vec") {
            call.args.get(1)
        } else {
            None
        };
        Some(DescParts::from_opts(lit, labels))
    }

    fn const_parts(
        &self,
        call: &'a CallExpr,
        kind: ConstKind,
    ) -> Option<(MetricType, DescParts<'a>)> {
        let metric_type = match kind {
            ConstKind::Fixed(t) => t,
            ConstKind::ByValueType => self.value_type(call.args.get(1)?)?,
        };
        let Node::Call(desc) = self.idents.deref(call.args.first()?)? else {
            return None;
        };
        if !self.is_client_ref(&desc.func, "NewDesc") {
            return None;
        }
        let name_arg = desc.args.first()?;
        let fq_name = match name_arg {
            Node::Call(inner) if self.is_client_ref(&inner.func, "BuildFQName") => {
                let [namespace, subsystem, name] = inner.args.as_slice() else {
                    return None;
                };
                FqNameExpr::Parts {
                    namespace: Some(namespace),
                    subsystem: Some(subsystem),
                    name: Some(name),
                }
            }
            other => FqNameExpr::Whole(other),
        };
        Some((
            metric_type,
            DescParts {
                fq_name,
                help: desc.args.get(1),
                variable_labels: desc.args.get(2),
                const_labels: desc.args.get(3),
            },
        ))
    }

    fn value_type(&self, node: &Node) -> Option<MetricType> {
        [
            ("CounterValue", MetricType::Counter),
            ("GaugeValue", MetricType::Gauge),
            ("UntypedValue", MetricType::Untyped),
        ]
        .into_iter()
        .find(|(name, _)| self.is_client_ref(node, name))
        .map(|(_, t)| t)
    }
}

/// Extract every statically-resolved metric declaration from `file`, in
/// source order.
pub fn extract_file(
    file: &SourceFile,
    constructors: &ConstructorTable,
) -> Result<Vec<MetricDescriptor>, ExtractError> {
    let binding = ImportBinding::resolve(&file.imports);
    if binding.is_empty() {
        log::trace!(target: LOG_TARGET, "{}: no metrics library imported", file.path);
        return Ok(Vec::new());
    }
    let idents = IdentTable::build(file);
    let resolver = Resolver::new(&idents);
    let matcher = Matcher {
        constructors,
        binding: &binding,
        builder: DescriptorBuilder::new(&resolver),
        idents: &idents,
    };
    let mut out = Vec::new();
    for decl in &file.decls {
        matcher.walk(decl, &mut out)?;
    }
    Ok(out)
}
