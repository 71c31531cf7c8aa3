//! # Default Object Builder
//!
//! Produces a fresh instance of a schema populated with per-field zero
//! values, or with whatever the schema's defaults provider supplies.

use modelkit_core::{Record, Value};

use crate::descriptor::TypeDescriptor;
use crate::registry::{DefaultsMode, SchemaRegistry};

/// Nested schema references deeper than this resolve to null. Guards
/// against self-referencing schemas.
pub const MAX_NESTING_DEPTH: usize = 32;

impl SchemaRegistry {
    /// A fresh default instance of `name`, or `None` when the schema is not
    /// registered.
    pub fn build_defaults(&self, name: &str) -> Option<Record> {
        self.defaults_at(name, 0)
    }

    pub(crate) fn defaults_at(&self, name: &str, depth: usize) -> Option<Record> {
        let fields = self.get_schema(name)?;
        let provider = self.defaults_provider(name);

        let mut instance = Record::with_capacity(fields.len());
        for (field, descriptor) in fields.iter() {
            let value = provider
                .and_then(|p| p(field, DefaultsMode::Build))
                .unwrap_or_else(|| self.zero_value(name, field, descriptor, depth));
            instance.insert(field, value);
        }
        Some(instance)
    }

    fn zero_value(&self, schema: &str, field: &str, descriptor: &TypeDescriptor, depth: usize) -> Value {
        match descriptor {
            TypeDescriptor::Primitive(primitive) => primitive.zero_value(),
            TypeDescriptor::Factory(factory) => factory.resolve().resolved(),
            TypeDescriptor::Token { kind, .. } => kind.zero_value(),
            TypeDescriptor::ArrayOf(_) => Value::Array(Vec::new()),
            TypeDescriptor::SchemaRef(target) => {
                if depth >= MAX_NESTING_DEPTH {
                    tracing::warn!(
                        schema = %schema,
                        field = %field,
                        target = %target,
                        depth,
                        "nesting depth exceeded while building defaults"
                    );
                    return Value::Null;
                }
                self.defaults_at(target, depth + 1)
                    .map(Value::Object)
                    .unwrap_or(Value::Null)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Primitive;
    use crate::registry::FieldMap;

    fn registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry.define(
            "address",
            FieldMap::new().field("street", "string(40)").field("zip", "int"),
        );
        registry.define(
            "user",
            FieldMap::new()
                .field("name", "string(20)")
                .field("age", "int")
                .field("score", "decimal")
                .field("active", "boolean")
                .field("meta", "object")
                .field("tags", "[string]")
                .field("list", "array")
                .field("avatar", "base64")
                .field("address", "address")
                .field("joined", "datetime"),
        );
        registry
    }

    #[test]
    fn test_zero_values_by_kind() {
        let defaults = registry().build_defaults("user").unwrap();
        assert_eq!(defaults.get("name"), Some(&Value::from("")));
        assert_eq!(defaults.get("age"), Some(&Value::Number(0.0)));
        assert_eq!(defaults.get("score"), Some(&Value::Number(0.0)));
        assert_eq!(defaults.get("active"), Some(&Value::Bool(false)));
        assert_eq!(defaults.get("meta"), Some(&Value::Object(Record::new())));
        assert_eq!(defaults.get("tags"), Some(&Value::Array(vec![])));
        assert_eq!(defaults.get("list"), Some(&Value::Array(vec![])));
        assert_eq!(defaults.get("avatar"), Some(&Value::Null));
        assert!(defaults.get("joined").unwrap().as_date().is_some());
    }

    #[test]
    fn test_field_order_preserved() {
        let defaults = registry().build_defaults("user").unwrap();
        let keys: Vec<_> = defaults.keys().collect();
        assert_eq!(
            keys,
            vec!["name", "age", "score", "active", "meta", "tags", "list", "avatar", "address", "joined"]
        );
    }

    #[test]
    fn test_nested_schema_defaults() {
        let defaults = registry().build_defaults("user").unwrap();
        let address = defaults.get("address").unwrap().as_object().unwrap();
        assert_eq!(address.get("street"), Some(&Value::from("")));
        assert_eq!(address.get("zip"), Some(&Value::Number(0.0)));
    }

    #[test]
    fn test_unknown_schema_is_none() {
        assert!(registry().build_defaults("ghost").is_none());
    }

    #[test]
    fn test_unregistered_reference_is_null() {
        let mut registry = SchemaRegistry::new();
        registry.define("order", FieldMap::new().field("customer", "customer"));
        let defaults = registry.build_defaults("order").unwrap();
        assert_eq!(defaults.get("customer"), Some(&Value::Null));
    }

    #[test]
    fn test_provider_wins_outright() {
        let mut registry = registry();
        registry.define_defaults("user", |field, mode| {
            assert_eq!(mode, DefaultsMode::Build);
            match field {
                "age" => Some(Value::Number(18.0)),
                "name" => Some(Value::from("anonymous")),
                _ => None,
            }
        });
        let defaults = registry.build_defaults("user").unwrap();
        assert_eq!(defaults.get("age"), Some(&Value::Number(18.0)));
        assert_eq!(defaults.get("name"), Some(&Value::from("anonymous")));
        assert_eq!(defaults.get("active"), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_primitives_and_factories() {
        let mut registry = SchemaRegistry::new();
        registry.define(
            "point",
            FieldMap::new()
                .field("x", Primitive::Number)
                .field("label", Primitive::String)
                .field("seed", TypeDescriptor::factory(|| Value::Number(7.0))),
        );
        let defaults = registry.build_defaults("point").unwrap();
        assert_eq!(defaults.get("x"), Some(&Value::Number(0.0)));
        assert_eq!(defaults.get("label"), Some(&Value::from("")));
        assert_eq!(defaults.get("seed"), Some(&Value::Number(7.0)));
    }

    #[test]
    fn test_self_reference_is_bounded() {
        let mut registry = SchemaRegistry::new();
        registry.define(
            "node",
            FieldMap::new().field("value", "int").field("next", "node"),
        );
        let defaults = registry.build_defaults("node").unwrap();

        let mut depth = 0;
        let mut current = defaults.get("next").cloned();
        while let Some(Value::Object(record)) = current {
            depth += 1;
            current = record.get("next").cloned();
        }
        assert_eq!(depth, MAX_NESTING_DEPTH);
        assert_eq!(current, Some(Value::Null));
    }

    #[test]
    fn test_instances_are_fresh() {
        let registry = registry();
        let mut first = registry.build_defaults("user").unwrap();
        first.insert("name", "changed");
        let second = registry.build_defaults("user").unwrap();
        assert_eq!(second.get("name"), Some(&Value::from("")));
    }
}
