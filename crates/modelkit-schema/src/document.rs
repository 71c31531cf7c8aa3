//! # Schema Definition Documents
//!
//! Schemas can be declared in YAML (or JSON, which is a YAML subset)
//! instead of code:
//!
//! ```yaml
//! schemas:
//!   address:
//!     fields:
//!       street: string(40)
//!       zip: int
//!   user:
//!     fields:
//!       name: string(20)
//!       age: int
//!       tags: "[string]"
//!       address: address
//!     defaults:
//!       age: 18
//!     rules: [name, age]
//!     required: [name]
//! ```
//!
//! Field descriptors are token strings, or literal templates (`0`,
//! `false`, `{}`, `[]`, `null`) standing for their primitive. Schema and
//! field order follow the document.
//!
//! `defaults` becomes a static defaults provider answering in both build
//! and fill mode. `rules` is stored as the schema's raw rule list.
//! `required` installs a required-fields validator.

use std::path::Path;

use modelkit_core::{ModelkitError, Record, Value};

use crate::descriptor::TypeDescriptor;
use crate::dispatch::required_fields;
use crate::registry::{FieldMap, SchemaRegistry};

const TOP_LEVEL_KEYS: &[&str] = &["schemas"];
const SCHEMA_KEYS: &[&str] = &["fields", "defaults", "rules", "required"];

/// One schema as declared in a document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchemaDefinition {
    pub fields: FieldMap,
    pub defaults: Record,
    pub rules: Vec<String>,
    pub required: Vec<String>,
}

/// A parsed schema definition document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchemaDocument {
    schemas: Vec<(String, SchemaDefinition)>,
}

impl SchemaDocument {
    /// Parse a document. `source_name` identifies the text in errors.
    pub fn from_yaml_str(text: &str, source_name: &str) -> Result<Self, ModelkitError> {
        let root: serde_yaml::Value = serde_yaml::from_str(text)
            .map_err(|e| ModelkitError::definition(source_name, format!("invalid YAML: {e}")))?;
        let fail = |reason: String| ModelkitError::definition(source_name, reason);

        let root = match root {
            serde_yaml::Value::Null => return Ok(Self::default()),
            serde_yaml::Value::Mapping(map) => map,
            other => return Err(fail(format!("expected a mapping at top level, found {}", kind_name(&other)))),
        };
        check_keys(&root, TOP_LEVEL_KEYS, "document").map_err(fail)?;

        let mut document = Self::default();
        let schemas = match root.get("schemas") {
            None | Some(serde_yaml::Value::Null) => return Ok(document),
            Some(serde_yaml::Value::Mapping(map)) => map,
            Some(other) => {
                return Err(fail(format!("`schemas` must be a mapping, found {}", kind_name(other))))
            }
        };

        for (name, body) in schemas {
            let name = key_text(name).map_err(fail)?;
            let definition = parse_definition(&name, body).map_err(fail)?;
            document.schemas.push((name, definition));
        }
        Ok(document)
    }

    /// Read and parse a document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ModelkitError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let document = Self::from_yaml_str(&text, &path.display().to_string())?;
        tracing::debug!(path = %path.display(), schemas = document.len(), "schema document loaded");
        Ok(document)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&SchemaDefinition> {
        self.schemas.iter().find(|(n, _)| n == name).map(|(_, d)| d)
    }

    /// Schema names in document order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.iter().map(|(n, _)| n.as_str())
    }

    /// Register every schema, in document order.
    pub fn register_into(&self, registry: &mut SchemaRegistry) {
        for (name, definition) in &self.schemas {
            registry.define(name.as_str(), definition.fields.clone());

            if !definition.defaults.is_empty() {
                let defaults = definition.defaults.clone();
                registry.define_defaults(name.as_str(), move |field, _mode| defaults.get(field).cloned());
            }
            if !definition.rules.is_empty() {
                registry.define_validation_rules(name.as_str(), definition.rules.clone());
            }
            if !definition.required.is_empty() {
                registry.define_validation_rules(name.as_str(), required_fields(definition.required.clone()));
            }
        }
    }
}

fn parse_definition(name: &str, body: &serde_yaml::Value) -> Result<SchemaDefinition, String> {
    let body = match body {
        serde_yaml::Value::Null => return Ok(SchemaDefinition::default()),
        serde_yaml::Value::Mapping(map) => map,
        other => {
            return Err(format!("schema `{name}` must be a mapping, found {}", kind_name(other)));
        }
    };
    check_keys(body, SCHEMA_KEYS, &format!("schema `{name}`"))?;

    let mut definition = SchemaDefinition::default();

    match body.get("fields") {
        None | Some(serde_yaml::Value::Null) => {}
        Some(serde_yaml::Value::Mapping(fields)) => {
            for (field, descriptor) in fields {
                let field = key_text(field)?;
                let template = yaml_to_value(descriptor)?;
                definition
                    .fields
                    .insert(field, TypeDescriptor::from_template(&template));
            }
        }
        Some(other) => {
            return Err(format!("`{name}.fields` must be a mapping, found {}", kind_name(other)));
        }
    }

    match body.get("defaults") {
        None | Some(serde_yaml::Value::Null) => {}
        Some(serde_yaml::Value::Mapping(defaults)) => {
            for (field, value) in defaults {
                definition.defaults.insert(key_text(field)?, yaml_to_value(value)?);
            }
        }
        Some(other) => {
            return Err(format!("`{name}.defaults` must be a mapping, found {}", kind_name(other)));
        }
    }

    definition.rules = string_list(body.get("rules"), name, "rules")?;
    definition.required = string_list(body.get("required"), name, "required")?;
    Ok(definition)
}

fn check_keys(map: &serde_yaml::Mapping, allowed: &[&str], context: &str) -> Result<(), String> {
    for key in map.keys() {
        let key = key_text(key)?;
        if !allowed.contains(&key.as_str()) {
            return Err(format!(
                "unknown key `{key}` in {context}, expected one of: {}",
                allowed.join(", ")
            ));
        }
    }
    Ok(())
}

fn string_list(value: Option<&serde_yaml::Value>, name: &str, key: &str) -> Result<Vec<String>, String> {
    match value {
        None | Some(serde_yaml::Value::Null) => Ok(Vec::new()),
        Some(serde_yaml::Value::Sequence(items)) => items.iter().map(key_text).collect(),
        Some(other) => Err(format!("`{name}.{key}` must be a list, found {}", kind_name(other))),
    }
}

fn key_text(key: &serde_yaml::Value) -> Result<String, String> {
    match key {
        serde_yaml::Value::String(s) => Ok(s.clone()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        other => Err(format!("expected a name, found {}", kind_name(other))),
    }
}

fn kind_name(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "a boolean",
        serde_yaml::Value::Number(_) => "a number",
        serde_yaml::Value::String(_) => "a string",
        serde_yaml::Value::Sequence(_) => "a list",
        serde_yaml::Value::Mapping(_) => "a mapping",
        serde_yaml::Value::Tagged(_) => "a tagged value",
    }
}

/// Convert YAML into a [`Value`], keeping mapping order. Tags are ignored.
pub fn yaml_to_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => n
            .as_f64()
            .map(Value::Number)
            .ok_or_else(|| format!("unsupported YAML number: {n}")),
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => {
            let items: Result<Vec<Value>, String> = seq.iter().map(yaml_to_value).collect();
            Ok(Value::Array(items?))
        }
        serde_yaml::Value::Mapping(map) => {
            let mut record = Record::with_capacity(map.len());
            for (k, v) in map {
                record.insert(key_text(k)?, yaml_to_value(v)?);
            }
            Ok(Value::Object(record))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_value(&tagged.value),
    }
}
