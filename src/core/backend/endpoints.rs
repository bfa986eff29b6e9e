//! Endpoint map and path resolution.
//!
//! The backend URL layout is configuration, not code: every tool refers to a
//! logical `section.operation` key and the [`EndpointMap`] loaded at startup
//! turns that key into a request path.
//!
//! ```yaml
//! endpoints:
//!   balance:
//!     balance: /balance
//!     mensual: /balance/mensual/{ano}/{mes}
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{BackendError, BackendResult};

/// Logical identifier of a backend operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EndpointKey {
    pub section: &'static str,
    pub operation: &'static str,
}

impl EndpointKey {
    pub const fn new(section: &'static str, operation: &'static str) -> Self {
        Self { section, operation }
    }
}

impl fmt::Display for EndpointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section, self.operation)
    }
}

/// Two-level mapping `section -> operation -> path template`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndpointMap(BTreeMap<String, BTreeMap<String, String>>);

impl EndpointMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a template. Mostly useful for tests and programmatic setup.
    pub fn insert(
        &mut self,
        section: impl Into<String>,
        operation: impl Into<String>,
        template: impl Into<String>,
    ) {
        self.0
            .entry(section.into())
            .or_default()
            .insert(operation.into(), template.into());
    }

    /// Builder-style variant of [`EndpointMap::insert`].
    pub fn with(
        mut self,
        section: impl Into<String>,
        operation: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        self.insert(section, operation, template);
        self
    }

    /// Number of configured templates across all sections.
    pub fn len(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw template for a key. Empty templates count as missing.
    pub fn template(&self, key: EndpointKey) -> BackendResult<&str> {
        self.0
            .get(key.section)
            .and_then(|ops| ops.get(key.operation))
            .map(String::as_str)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| BackendError::missing_endpoint(key.section, key.operation))
    }

    /// Whether a key has a usable template.
    pub fn contains(&self, key: EndpointKey) -> bool {
        self.template(key).is_ok()
    }

    /// Keys from `required` that have no template, in input order.
    pub fn missing<'a>(
        &self,
        required: impl IntoIterator<Item = &'a EndpointKey>,
    ) -> Vec<EndpointKey> {
        required
            .into_iter()
            .filter(|key| !self.contains(**key))
            .copied()
            .collect()
    }

    /// Resolve a key into a concrete path, substituting `{name}` placeholders.
    ///
    /// Variables not referenced by the template are ignored.
    pub fn resolve(&self, key: EndpointKey, vars: &[(&str, String)]) -> BackendResult<String> {
        let template = self.template(key)?;
        let malformed = || BackendError::MalformedTemplate {
            section: key.section.to_string(),
            operation: key.operation.to_string(),
            template: template.to_string(),
        };

        let mut path = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            path.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let close = after.find('}').ok_or_else(malformed)?;
            let name = &after[..close];
            if name.is_empty() || name.contains('{') {
                return Err(malformed());
            }

            let value = vars
                .iter()
                .find(|(var, _)| *var == name)
                .map(|(_, value)| value)
                .ok_or_else(|| BackendError::MissingPathVariable {
                    section: key.section.to_string(),
                    operation: key.operation.to_string(),
                    variable: name.to_string(),
                })?;
            path.push_str(value);
            rest = &after[close + 1..];
        }

        if rest.contains('}') {
            return Err(malformed());
        }
        path.push_str(rest);

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BALANCE: EndpointKey = EndpointKey::new("balance", "balance");
    const MENSUAL: EndpointKey = EndpointKey::new("balance", "mensual");

    fn map() -> EndpointMap {
        EndpointMap::new()
            .with("balance", "balance", "/balance")
            .with("balance", "mensual", "/balance/mensual/{ano}/{mes}")
            .with("categorias", "listar", "")
    }

    #[test]
    fn test_resolve_plain_template() {
        assert_eq!(map().resolve(BALANCE, &[]).unwrap(), "/balance");
    }

    #[test]
    fn test_resolve_substitutes_variables() {
        let path = map()
            .resolve(
                MENSUAL,
                &[("mes", "11".to_string()), ("ano", "2025".to_string())],
            )
            .unwrap();
        assert_eq!(path, "/balance/mensual/2025/11");
    }

    #[test]
    fn test_resolve_ignores_unused_variables() {
        let path = map()
            .resolve(BALANCE, &[("ano", "2025".to_string())])
            .unwrap();
        assert_eq!(path, "/balance");
    }

    #[test]
    fn test_resolve_missing_section_or_operation() {
        let err = map()
            .resolve(EndpointKey::new("gasto_fijo", "crear"), &[])
            .unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("gasto_fijo.crear"));

        let err = map()
            .resolve(EndpointKey::new("balance", "acumulado"), &[])
            .unwrap_err();
        assert!(matches!(err, BackendError::MissingEndpoint { .. }));
    }

    #[test]
    fn test_empty_template_counts_as_missing() {
        let err = map()
            .resolve(EndpointKey::new("categorias", "listar"), &[])
            .unwrap_err();
        assert!(matches!(err, BackendError::MissingEndpoint { .. }));
    }

    #[test]
    fn test_resolve_missing_variable() {
        let err = map()
            .resolve(MENSUAL, &[("ano", "2025".to_string())])
            .unwrap_err();
        match err {
            BackendError::MissingPathVariable { variable, .. } => assert_eq!(variable, "mes"),
            other => panic!("Expected MissingPathVariable, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_malformed_template() {
        let map = EndpointMap::new()
            .with("a", "open", "/x/{id")
            .with("a", "close", "/x/id}")
            .with("a", "empty", "/x/{}");
        for op in ["open", "close", "empty"] {
            let err = map
                .resolve(EndpointKey::new("a", op), &[("id", "1".to_string())])
                .unwrap_err();
            assert!(matches!(err, BackendError::MalformedTemplate { .. }), "{op}");
        }
    }

    #[test]
    fn test_missing_keys() {
        let required = [
            BALANCE,
            MENSUAL,
            EndpointKey::new("balance", "acumulado"),
            EndpointKey::new("categorias", "listar"),
        ];
        let missing = map().missing(&required);
        assert_eq!(
            missing,
            vec![
                EndpointKey::new("balance", "acumulado"),
                EndpointKey::new("categorias", "listar"),
            ]
        );
    }

    #[test]
    fn test_deserialize_from_yaml() {
        let yaml = "balance:\n  balance: /balance\nmovimientos:\n  crear: /movimientos\n";
        let map: EndpointMap = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(map.len(), 2);
        assert!(map.contains(EndpointKey::new("movimientos", "crear")));
    }
}
