//! Registry of known configuration APIs

use std::collections::HashMap;

/// A configuration API definitions may declare as their `type.api`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEntry {
    pub id: String,
    /// Replacement API when this one is deprecated.
    pub deprecated_by: Option<String>,
}

/// Set of API identifiers the loader accepts.
///
/// # Example
///
/// ```
/// use cascade_meta::ApiRegistry;
///
/// let apis = ApiRegistry::with_builtins();
/// assert!(apis.contains("alerting-profile"));
/// assert_eq!(apis.deprecated_by("auto-tag"), Some("builtin:tags.auto-tagging"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ApiRegistry {
    apis: HashMap<String, ApiEntry>,
}

impl ApiRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in API list.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for id in [
            "alerting-profile",
            "anomaly-detection-metrics",
            "app-detection-rule",
            "application-mobile",
            "application-web",
            "aws-credentials",
            "azure-credentials",
            "calculated-metrics-log",
            "calculated-metrics-service",
            "conditional-naming-host",
            "conditional-naming-processgroup",
            "conditional-naming-service",
            "credential-vault",
            "custom-service-java",
            "dashboard",
            "extension",
            "kubernetes-credentials",
            "maintenance-window",
            "management-zone",
            "notification",
            "request-attributes",
            "request-naming-service",
            "slo",
            "synthetic-location",
            "synthetic-monitor",
            "builtin:alerting.profile",
            "builtin:management-zones",
            "builtin:problem.notifications",
            "builtin:tags.auto-tagging",
        ] {
            registry.register(id);
        }
        registry.register_deprecated("auto-tag", "builtin:tags.auto-tagging");
        registry
    }

    /// Register an API, replacing any previous entry with the same id.
    pub fn register(&mut self, id: impl Into<String>) {
        let id = id.into();
        self.apis.insert(
            id.clone(),
            ApiEntry {
                id,
                deprecated_by: None,
            },
        );
    }

    /// Register an API that is still accepted but should be migrated.
    pub fn register_deprecated(&mut self, id: impl Into<String>, replacement: impl Into<String>) {
        let id = id.into();
        self.apis.insert(
            id.clone(),
            ApiEntry {
                id,
                deprecated_by: Some(replacement.into()),
            },
        );
    }

    pub fn get(&self, id: &str) -> Option<&ApiEntry> {
        self.apis.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.apis.contains_key(id)
    }

    pub fn deprecated_by(&self, id: &str) -> Option<&str> {
        self.apis.get(id)?.deprecated_by.as_deref()
    }

    /// All known API ids, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.apis.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.apis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apis.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ApiRegistry {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut registry = Self::new();
        for id in iter {
            registry.register(id);
        }
        registry
    }
}
