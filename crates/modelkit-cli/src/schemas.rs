//! # Shared Loading
//!
//! Schema documents and input payloads are read the same way by every
//! subcommand.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Args;
use modelkit_core::{Record, Value};
use modelkit_schema::document::yaml_to_value;
use modelkit_schema::{ResourceLookup, SchemaDocument, SchemaRegistry};

/// Where to load schema definitions from.
#[derive(Args, Debug, Clone)]
pub struct SchemaSource {
    /// Schema definition document (YAML or JSON).
    #[arg(long, value_name = "FILE")]
    pub schemas: PathBuf,
}

impl SchemaSource {
    /// Load the document into a fresh registry, optionally bound to a
    /// resource lookup.
    pub fn load(&self, resources: Option<Arc<dyn ResourceLookup>>) -> anyhow::Result<SchemaRegistry> {
        let document = SchemaDocument::from_path(&self.schemas)
            .with_context(|| format!("failed to load schemas from {}", self.schemas.display()))?;

        let mut registry = match resources {
            Some(lookup) => SchemaRegistry::new().with_resources(lookup),
            None => SchemaRegistry::new(),
        };
        document.register_into(&mut registry);
        tracing::debug!(schemas = registry.schema_count(), "registry ready");
        Ok(registry)
    }
}

/// Fail with the list of known schemas when `name` is not registered.
pub fn require_schema(registry: &SchemaRegistry, name: &str) -> anyhow::Result<()> {
    if registry.contains(name) {
        return Ok(());
    }
    let known = registry.schema_names();
    if known.is_empty() {
        bail!("unknown schema `{name}`: no schemas are defined");
    }
    bail!("unknown schema `{name}`, expected one of: {}", known.join(", "));
}

/// Read a JSON or YAML payload, preserving object key order.
pub fn read_input(path: &Path) -> anyhow::Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read input {}", path.display()))?;
    let yaml: serde_yaml::Value = serde_yaml::from_str(&text)
        .with_context(|| format!("invalid input document {}", path.display()))?;
    yaml_to_value(&yaml).map_err(|reason| anyhow::anyhow!("invalid input document {}: {reason}", path.display()))
}

/// Render a record as JSON.
pub fn to_json(record: Record, pretty: bool) -> anyhow::Result<String> {
    let value = Value::Object(record);
    let text = if pretty {
        serde_json::to_string_pretty(&value)
    } else {
        serde_json::to_string(&value)
    };
    text.context("failed to serialize output")
}
