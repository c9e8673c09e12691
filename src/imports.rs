//! Import binding resolution for the metrics libraries.

use crate::ast::{ImportName, ImportSpec};

/// Import path of the instrumentation client library.
pub const CLIENT_PATH: &str = "github.com/prometheus/client_golang/prometheus";
/// Import path of the auto-registering factory wrapper.
pub const FACTORY_PATH: &str = "github.com/prometheus/client_golang/prometheus/promauto";

const CLIENT_DEFAULT: &str = "prometheus";
const FACTORY_DEFAULT: &str = "promauto";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// How one library is reachable from a file.
pub struct LibraryBinding {
    /// Qualifier used in selector calls, e.g. `prometheus` or an alias.
    pub alias: Option<String>,
    /// Exported names are merged into the file scope.
    pub dot: bool,
}

impl LibraryBinding {
    pub fn is_bound(&self) -> bool {
        self.alias.is_some() || self.dot
    }

    /// `true` when `qualifier` names this library.
    pub fn qualifies(&self, qualifier: &str) -> bool {
        self.alias.as_deref() == Some(qualifier)
    }

    fn bind(&mut self, spec: &ImportSpec, default: &str) {
        match &spec.name {
            ImportName::Default => self.alias = Some(default.to_string()),
            ImportName::Alias(a) => self.alias = Some(a.clone()),
            ImportName::Dot => self.dot = true,
            ImportName::Blank => {}
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Local names under which a file reaches the client and factory libraries.
pub struct ImportBinding {
    pub client: LibraryBinding,
    pub factory: LibraryBinding,
}

impl ImportBinding {
    /// Compute the binding from a file's import declarations.
    pub fn resolve(imports: &[ImportSpec]) -> Self {
        let mut binding = Self::default();
        for spec in imports {
            match spec.path.as_str() {
                CLIENT_PATH => binding.client.bind(spec, CLIENT_DEFAULT),
                FACTORY_PATH => binding.factory.bind(spec, FACTORY_DEFAULT),
                _ => {}
            }
        }
        binding
    }

    /// Neither library is imported: nothing in the file can match.
    pub fn is_empty(&self) -> bool {
        !self.client.is_bound() && !self.factory.is_bound()
    }

    /// Unqualified constructor calls are meaningful.
    pub fn any_dot(&self) -> bool {
        self.client.dot || self.factory.dot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Position;

    fn spec(name: ImportName, path: &str) -> ImportSpec {
        ImportSpec {
            name,
            path: path.to_string(),
            pos: Position::new("x.go", 1, 1),
        }
    }

    #[test]
    fn test_default_names() {
        let b = ImportBinding::resolve(&[
            spec(ImportName::Default, CLIENT_PATH),
            spec(ImportName::Default, FACTORY_PATH),
        ]);
        assert_eq!(b.client.alias.as_deref(), Some("prometheus"));
        assert_eq!(b.factory.alias.as_deref(), Some("promauto"));
        assert!(!b.any_dot());
    }

    #[test]
    fn test_alias_and_dot_import() {
        let b = ImportBinding::resolve(&[
            spec(ImportName::Alias("prom".into()), CLIENT_PATH),
            spec(ImportName::Dot, FACTORY_PATH),
        ]);
        assert!(b.client.qualifies("prom"));
        assert!(!b.client.qualifies("prometheus"));
        assert!(b.factory.dot);
        assert_eq!(b.factory.alias, None);
    }

    #[test]
    fn test_unrelated_imports_yield_empty_binding() {
        let b = ImportBinding::resolve(&[
            spec(ImportName::Default, "fmt"),
            spec(ImportName::Blank, CLIENT_PATH),
            spec(ImportName::Default, "k8s.io/component-base/metrics"),
        ]);
        assert!(b.is_empty());
    }
}
