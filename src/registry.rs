//! Registry of named tools and their fixed-output handlers
//!
//! Built once at startup and read-only afterwards. Dispatch is a map lookup;
//! handlers are pure zero-argument functions, so invocation cannot
//! transiently fail.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;

pub type ToolHandler = Box<dyn Fn() -> Value + Send + Sync>;

/// Name/description/purpose metadata reported by the catalog tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSummary {
    pub name: String,
    pub description: String,
    pub purpose: String,
}

pub struct ToolEntry {
    pub name: String,
    pub description: String,
    pub purpose: String,
    handler: ToolHandler,
}

impl ToolEntry {
    pub fn summary(&self) -> ToolSummary {
        ToolSummary {
            name: self.name.clone(),
            description: self.description.clone(),
            purpose: self.purpose.clone(),
        }
    }
}

/// Ordered tool table. Entries keep registration order for listing; the
/// index is a plain name lookup for dispatch.
#[derive(Default)]
pub struct ToolRegistry {
    entries: Vec<ToolEntry>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        purpose: impl Into<String>,
        handler: ToolHandler,
    ) -> Result<(), AppError> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(AppError::duplicate_registration(name));
        }

        self.index.insert(name.clone(), self.entries.len());
        self.entries.push(ToolEntry {
            name,
            description: description.into(),
            purpose: purpose.into(),
            handler,
        });
        Ok(())
    }

    /// Look up `name` and produce its payload. Arguments are accepted for
    /// protocol symmetry only; no registered tool reads them.
    pub fn invoke(
        &self,
        name: &str,
        _arguments: Option<&serde_json::Map<String, Value>>,
    ) -> Result<Value, AppError> {
        let entry = self
            .index
            .get(name)
            .and_then(|position| self.entries.get(*position))
            .ok_or_else(|| AppError::tool_not_found(name))?;

        Ok((entry.handler)())
    }

    /// Metadata for all registered tools, in registration order.
    pub fn catalog(&self) -> Vec<ToolSummary> {
        self.entries.iter().map(ToolEntry::summary).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Map};

    use super::*;

    fn registry_with(names: &[&str]) -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        for name in names {
            let payload = json!({ "tool": name });
            registry
                .register(
                    *name,
                    format!("{name} description"),
                    format!("{name} purpose"),
                    Box::new(move || payload.clone()),
                )
                .expect("registration should succeed");
        }
        registry
    }

    #[test]
    fn rejects_duplicate_registration() {
        let mut registry = registry_with(&["alpha"]);

        let error = registry
            .register(
                "alpha",
                "again",
                "again",
                Box::new(|| json!({})),
            )
            .expect_err("duplicate name must fail");
        assert!(matches!(error, AppError::DuplicateRegistration { name } if name == "alpha"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn invoke_unknown_name_fails() {
        let registry = registry_with(&["alpha"]);

        let error = registry
            .invoke("does_not_exist", None)
            .expect_err("unknown name must fail");
        assert!(matches!(error, AppError::ToolNotFound { name } if name == "does_not_exist"));
    }

    #[test]
    fn invoke_ignores_arguments() {
        let registry = registry_with(&["alpha"]);

        let mut arguments = Map::new();
        arguments.insert("anything".to_string(), json!(["goes", 42]));

        let bare = registry.invoke("alpha", None).expect("invoke without args");
        let with_args = registry
            .invoke("alpha", Some(&arguments))
            .expect("invoke with args");
        assert_eq!(bare, with_args);
    }

    #[test]
    fn catalog_preserves_registration_order() {
        let registry = registry_with(&["alpha", "beta", "gamma"]);

        let names: Vec<String> = registry
            .catalog()
            .into_iter()
            .map(|summary| summary.name)
            .collect();
        assert_eq!(names, vec!["alpha", "beta", "gamma"]);
    }
}
