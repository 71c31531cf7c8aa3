//! # Error Aggregate
//!
//! [`ErrorBuilder`] collects field-level validation failures so a single
//! validation pass can report every problem at once. Records are kept in
//! insertion order and duplicates for the same field are preserved.
//!
//! ## Messages and preparation
//!
//! A message that starts with `@` is a resource reference: bare `@` means
//! "look up the field name", `@key` means "look up `key`". Resolution and
//! the registered substitution rules are applied by [`ErrorBuilder::prepare`],
//! which materializes the final text into a cache. Reads after preparation
//! use the cache; any mutation drops it, and the next preparation starts
//! again from the raw records, so substitution rules never apply twice.
//!
//! Unresolvable references fall back to `The field "<name>" is required.`

use std::fmt;
use std::sync::Arc;

use modelkit_core::ModelkitError;
use serde::{Deserialize, Serialize};

use crate::resource::ResourceLookup;

/// Leading character of resource-reference messages.
pub const RESOURCE_MARKER: char = '@';

const REQUIRED_TEMPLATE: &str = "The field \"@\" is required.";

/// A single field error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Field identifier.
    pub name: String,
    /// Message text or resource reference.
    pub error: String,
    /// Structural path, when supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Custom resource resolver: key → text.
pub type ResourceFn = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Ordered collection of field errors.
#[derive(Clone, Default)]
pub struct ErrorBuilder {
    errors: Vec<ErrorRecord>,
    replacers: Vec<(String, String)>,
    on_resource: Option<ResourceFn>,
    lookup: Option<Arc<dyn ResourceLookup>>,
    resource_name: String,
    resource_prefix: String,
    prepared: Option<Vec<ErrorRecord>>,
}

impl ErrorBuilder {
    /// An aggregate with no resource source; every reference falls back
    /// to the generic message.
    pub fn new() -> Self {
        Self::default()
    }

    /// An aggregate resolving references through `resolver`.
    pub fn with_resolver<F>(resolver: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            on_resource: Some(Arc::new(resolver)),
            ..Self::default()
        }
    }

    /// An aggregate resolving references through the host's lookup, using
    /// the default (empty) resource name and prefix until
    /// [`resource`](Self::resource) is called.
    pub fn with_lookup(lookup: Arc<dyn ResourceLookup>) -> Self {
        Self {
            lookup: Some(lookup),
            ..Self::default()
        }
    }

    /// Resolve references from resource file `name`, with keys built as
    /// `prefix + key`. Replaces any custom resolver.
    pub fn resource(&mut self, name: impl Into<String>, prefix: impl Into<String>) -> &mut Self {
        self.resource_name = name.into();
        self.resource_prefix = prefix.into();
        self.on_resource = None;
        self.prepared = None;
        self
    }

    /// Add an error whose message is the field's own resource.
    pub fn add(&mut self, name: impl Into<String>) -> &mut Self {
        self.push(name.into(), String::new(), None)
    }

    /// Add an error with an explicit message or `@key` reference. An empty
    /// message means the field's own resource.
    pub fn add_error(&mut self, name: impl Into<String>, error: impl Into<String>) -> &mut Self {
        self.push(name.into(), error.into(), None)
    }

    /// Add an error with a structural path.
    pub fn add_at(
        &mut self,
        name: impl Into<String>,
        error: impl Into<String>,
        path: impl Into<String>,
    ) -> &mut Self {
        self.push(name.into(), error.into(), Some(path.into()))
    }

    /// Append every record of `other`.
    pub fn merge(&mut self, other: &ErrorBuilder) -> &mut Self {
        self.errors.extend(other.errors.iter().cloned());
        self.prepared = None;
        self
    }

    fn push(&mut self, name: String, error: String, path: Option<String>) -> &mut Self {
        let error = if error.is_empty() {
            RESOURCE_MARKER.to_string()
        } else {
            error
        };
        self.errors.push(ErrorRecord { name, error, path });
        self.prepared = None;
        self
    }

    /// Remove every record for `name`.
    pub fn remove(&mut self, name: &str) -> &mut Self {
        self.errors.retain(|e| e.name != name);
        self.prepared = None;
        self
    }

    /// Remove every record.
    pub fn clear(&mut self) -> &mut Self {
        self.errors.clear();
        self.prepared = None;
        self
    }

    /// Register a substitution applied to every message at preparation
    /// time. Each rule replaces the first occurrence of `search`. Rules run
    /// in registration order; re-registering `search` updates its
    /// replacement in place.
    pub fn replace(&mut self, search: impl Into<String>, replacement: impl Into<String>) -> &mut Self {
        let search = search.into();
        let replacement = replacement.into();
        match self.replacers.iter_mut().find(|(s, _)| *s == search) {
            Some((_, slot)) => *slot = replacement,
            None => self.replacers.push((search, replacement)),
        }
        self.prepared = None;
        self
    }

    /// True when any error is recorded.
    pub fn has_error(&self) -> bool {
        !self.errors.is_empty()
    }

    /// True when an error is recorded for `name`.
    pub fn has_error_for(&self, name: &str) -> bool {
        self.errors.iter().any(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Raw records, as added.
    pub fn errors(&self) -> &[ErrorRecord] {
        &self.errors
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared.is_some()
    }

    /// Resolve resource references and apply substitutions. Does nothing
    /// when already prepared.
    pub fn prepare(&mut self) -> &mut Self {
        if self.prepared.is_none() {
            self.prepared = Some(self.materialize());
        }
        self
    }

    /// Prepared records.
    pub fn prepared_errors(&mut self) -> &[ErrorRecord] {
        self.prepare();
        self.prepared.as_deref().unwrap_or(&[])
    }

    /// Prepared message of the first record for `name`.
    pub fn read(&mut self, name: &str) -> Option<&str> {
        self.prepared_errors()
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.error.as_str())
    }

    /// Serialize the prepared records as a JSON array. Pretty output is
    /// tab-indented.
    pub fn json(&mut self, pretty: bool) -> Result<String, ModelkitError> {
        let records = self.prepared_errors();
        if !pretty {
            return Ok(serde_json::to_string(records)?);
        }

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        records.serialize(&mut serializer)?;
        String::from_utf8(buf).map_err(|e| ModelkitError::Serialization(e.to_string()))
    }

    fn resolve(&self, key: &str) -> Option<String> {
        if let Some(resolver) = &self.on_resource {
            return resolver(key);
        }
        let lookup = self.lookup.as_ref()?;
        let key = format!("{}{}", self.resource_prefix, key);
        lookup.resource(&self.resource_name, &key)
    }

    fn materialize(&self) -> Vec<ErrorRecord> {
        self.errors
            .iter()
            .map(|record| {
                let mut error = match record.error.strip_prefix(RESOURCE_MARKER) {
                    Some(key) => {
                        let key = if key.is_empty() { record.name.as_str() } else { key };
                        self.resolve(key).unwrap_or_else(|| {
                            REQUIRED_TEMPLATE.replacen(RESOURCE_MARKER, &record.name, 1)
                        })
                    }
                    None => record.error.clone(),
                };
                for (search, replacement) in &self.replacers {
                    error = error.replacen(search.as_str(), replacement, 1);
                }
                ErrorRecord {
                    name: record.name.clone(),
                    error,
                    path: record.path.clone(),
                }
            })
            .collect()
    }
}

impl fmt::Debug for ErrorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorBuilder")
            .field("errors", &self.errors)
            .field("replacers", &self.replacers)
            .field("resource_name", &self.resource_name)
            .field("resource_prefix", &self.resource_prefix)
            .field("custom_resolver", &self.on_resource.is_some())
            .field("lookup", &self.lookup.is_some())
            .field("prepared", &self.prepared.is_some())
            .finish()
    }
}

impl fmt::Display for ErrorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            match &e.path {
                Some(path) => write!(f, "  {} ({path}): {}", e.name, e.error)?,
                None => write!(f, "  {}: {}", e.name, e.error)?,
            }
        }
        Ok(())
    }
}
