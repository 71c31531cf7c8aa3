//! # Validation Dispatch
//!
//! Runs a schema's registered validator against a model and returns the
//! populated [`ErrorBuilder`]. Also provides two validator adapters for the
//! common cases: a per-field check and a required-fields list.

use std::sync::Arc;

use modelkit_core::Value;

use crate::aggregate::{ErrorBuilder, RESOURCE_MARKER};
use crate::registry::{SchemaRegistry, Validator};

/// Outcome of a per-field check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldVerdict {
    Valid,
    /// Record the field's own resource message.
    Invalid,
    /// Record this message (or `@key` reference).
    Message(String),
}

impl From<bool> for FieldVerdict {
    fn from(valid: bool) -> Self {
        if valid {
            FieldVerdict::Valid
        } else {
            FieldVerdict::Invalid
        }
    }
}

impl SchemaRegistry {
    /// An empty aggregate bound to the registry's resource lookup, if any.
    pub fn error_builder(&self) -> ErrorBuilder {
        match self.resources() {
            Some(lookup) => ErrorBuilder::with_lookup(Arc::clone(lookup)),
            None => ErrorBuilder::new(),
        }
    }

    /// Validate `model` against the validator registered for `name`.
    ///
    /// Without a validator the result is an empty aggregate. The validator
    /// receives the schema's declared field names, or none when only the
    /// validator (and not the schema) was registered.
    pub fn validate(&self, name: &str, model: &Value) -> ErrorBuilder {
        let mut errors = self.error_builder();
        let Some(validator) = self.validator(name) else {
            return errors;
        };

        let fields: Vec<String> = self
            .get_schema(name)
            .map(|schema| schema.names().map(String::from).collect())
            .unwrap_or_default();

        validator(model, &fields, &mut errors);
        tracing::debug!(schema = %name, errors = errors.len(), "model validated");
        errors
    }
}

/// Adapt a per-field check into a validator. The check sees each declared
/// field's name and value; every recorded error carries the field name as
/// its path.
pub fn per_field<F>(check: F) -> Validator
where
    F: Fn(&str, Option<&Value>) -> FieldVerdict + Send + Sync + 'static,
{
    Arc::new(move |model: &Value, fields: &[String], errors: &mut ErrorBuilder| {
        for field in fields {
            match check(field.as_str(), model.get(field)) {
                FieldVerdict::Valid => {}
                FieldVerdict::Invalid => {
                    errors.add_at(field.as_str(), RESOURCE_MARKER.to_string(), field.as_str());
                }
                FieldVerdict::Message(message) => {
                    errors.add_at(field.as_str(), message, field.as_str());
                }
            }
        }
    })
}

/// A validator flagging each listed field that is missing, null, an empty
/// string or an empty array.
pub fn required_fields<I, S>(required: I) -> Validator
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let required: Vec<String> = required.into_iter().map(Into::into).collect();
    Arc::new(move |model: &Value, _fields: &[String], errors: &mut ErrorBuilder| {
        for field in &required {
            if is_blank(model.get(field)) {
                errors.add(field.as_str());
            }
        }
    })
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Deferred(d)) => is_blank(Some(&d.resolve())),
        Some(_) => false,
    }
}
