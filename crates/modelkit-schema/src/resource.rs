//! # Resource Lookup
//!
//! Localized error messages come from the hosting application. The
//! aggregate only needs one capability from it: given a resource file name
//! and a key, return the text or nothing. Missing text is a normal outcome
//! and makes the aggregate fall back to its generic "required" message.

use std::collections::HashMap;
use std::path::Path;

use modelkit_core::ModelkitError;
use serde::Deserialize;

/// Host-provided resource text source.
pub trait ResourceLookup: Send + Sync {
    /// Look up `key` in the resource file `name`.
    fn resource(&self, name: &str, key: &str) -> Option<String>;
}

impl<F> ResourceLookup for F
where
    F: Fn(&str, &str) -> Option<String> + Send + Sync,
{
    fn resource(&self, name: &str, key: &str) -> Option<String> {
        self(name, key)
    }
}

/// In-memory resources: resource file name → key → text.
///
/// Loadable from YAML or JSON shaped as
///
/// ```yaml
/// default:
///   email: Please enter a valid e-mail address.
/// checkout:
///   err_email: E-mail is required to place an order.
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct StaticResources {
    files: HashMap<String, HashMap<String, String>>,
}

impl StaticResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        name: impl Into<String>,
        key: impl Into<String>,
        text: impl Into<String>,
    ) -> &mut Self {
        self.files
            .entry(name.into())
            .or_default()
            .insert(key.into(), text.into());
        self
    }

    /// Parse resources from YAML (or JSON) text. `source_name` identifies
    /// the text in error messages.
    pub fn from_yaml_str(text: &str, source_name: &str) -> Result<Self, ModelkitError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
            .map_err(|e| ModelkitError::definition(source_name, format!("invalid resources: {e}")))
    }

    /// Read and parse a resource file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ModelkitError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let resources = Self::from_yaml_str(&text, &path.display().to_string())?;
        tracing::debug!(path = %path.display(), files = resources.files.len(), "resources loaded");
        Ok(resources)
    }

    pub fn is_empty(&self) -> bool {
        self.files.values().all(HashMap::is_empty)
    }
}

impl ResourceLookup for StaticResources {
    fn resource(&self, name: &str, key: &str) -> Option<String> {
        self.files.get(name)?.get(key).cloned()
    }
}
