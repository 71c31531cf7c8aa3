//! # Schema Registry
//!
//! Maps schema names to ordered field definitions, plus the optional
//! per-schema defaults provider, validator and raw validation rule list.
//!
//! ## Lifecycle
//!
//! The registry is an ordinary value: build it during start-up through
//! `&mut self`, then share it by reference. Every read path takes `&self`
//! and every provider is `Send + Sync`, so a fully built registry can be
//! shared across threads without locking.
//!
//! ## Overwrite semantics
//!
//! Registering a name that already exists silently replaces its field
//! map (last writer wins). A previously registered defaults provider or
//! validator survives re-registration unless a new one is supplied.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use modelkit_core::Value;

use crate::aggregate::ErrorBuilder;
use crate::descriptor::TypeDescriptor;
use crate::resource::ResourceLookup;

/// Distinguishes the two situations in which a defaults provider is asked
/// for a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefaultsMode {
    /// Building an empty instance.
    Build,
    /// Filling a value that is missing from coercion input.
    Fill,
}

/// Per-schema default value source. Returning `None` means "no override".
pub type DefaultsProvider = Arc<dyn Fn(&str, DefaultsMode) -> Option<Value> + Send + Sync>;

/// Per-schema validator: receives the model, the schema's field names and
/// the aggregate to populate.
pub type Validator = Arc<dyn Fn(&Value, &[String], &mut ErrorBuilder) + Send + Sync>;

/// Argument to [`SchemaRegistry::define_validation_rules`].
#[derive(Clone)]
pub enum ValidationRules {
    /// A raw list of rule names, stored for callers to read back.
    Fields(Vec<String>),
    /// A validator function, installed as the schema's validator.
    Validator(Validator),
}

impl From<Vec<String>> for ValidationRules {
    fn from(fields: Vec<String>) -> Self {
        ValidationRules::Fields(fields)
    }
}

impl From<Vec<&str>> for ValidationRules {
    fn from(fields: Vec<&str>) -> Self {
        ValidationRules::Fields(fields.into_iter().map(String::from).collect())
    }
}

impl From<Validator> for ValidationRules {
    fn from(validator: Validator) -> Self {
        ValidationRules::Validator(validator)
    }
}

/// Ordered mapping from field name to [`TypeDescriptor`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldMap {
    fields: Vec<(String, TypeDescriptor)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn field(mut self, name: impl Into<String>, descriptor: impl Into<TypeDescriptor>) -> Self {
        self.insert(name, descriptor);
        self
    }

    /// Insert or replace a field. Replacing keeps the field's position.
    pub fn insert(&mut self, name: impl Into<String>, descriptor: impl Into<TypeDescriptor>) {
        let name = name.into();
        let descriptor = descriptor.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = descriptor,
            None => self.fields.push((name, descriptor)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&TypeDescriptor> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, d)| d)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeDescriptor)> {
        self.fields.iter().map(|(n, d)| (n.as_str(), d))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, D: Into<TypeDescriptor>> FromIterator<(K, D)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, D)>>(iter: I) -> Self {
        let mut map = FieldMap::new();
        for (name, descriptor) in iter {
            map.insert(name, descriptor);
        }
        map
    }
}

/// Registry of named schemas.
#[derive(Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, FieldMap>,
    defaults: HashMap<String, DefaultsProvider>,
    validators: HashMap<String, Validator>,
    rules: HashMap<String, Vec<String>>,
    resources: Option<Arc<dyn ResourceLookup>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the host's resource lookup. Aggregates returned by
    /// [`validate`](Self::validate) are bound to it.
    pub fn with_resources(mut self, lookup: Arc<dyn ResourceLookup>) -> Self {
        self.resources = Some(lookup);
        self
    }

    pub fn resources(&self) -> Option<&Arc<dyn ResourceLookup>> {
        self.resources.as_ref()
    }

    /// Register a schema, replacing any previous definition of `name`.
    /// Returns the stored field map.
    pub fn define(&mut self, name: impl Into<String>, fields: FieldMap) -> &FieldMap {
        self.define_with(name, fields, None, None)
    }

    /// Register a schema together with its optional providers. A provider
    /// left as `None` keeps whatever was registered before.
    pub fn define_with(
        &mut self,
        name: impl Into<String>,
        fields: FieldMap,
        defaults: Option<DefaultsProvider>,
        validator: Option<Validator>,
    ) -> &FieldMap {
        let name = name.into();

        if let Some(provider) = defaults {
            self.defaults.insert(name.clone(), provider);
        }
        if let Some(validator) = validator {
            self.validators.insert(name.clone(), validator);
        }

        if self.schemas.contains_key(&name) {
            tracing::debug!(schema = %name, fields = fields.len(), "schema re-registered, previous definition replaced");
        } else {
            tracing::debug!(schema = %name, fields = fields.len(), "schema registered");
        }

        match self.schemas.entry(name) {
            Entry::Occupied(mut entry) => {
                entry.insert(fields);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(fields),
        }
    }

    /// Install (or replace) the defaults provider for `name`.
    pub fn define_defaults<F>(&mut self, name: impl Into<String>, provider: F)
    where
        F: Fn(&str, DefaultsMode) -> Option<Value> + Send + Sync + 'static,
    {
        self.defaults.insert(name.into(), Arc::new(provider));
    }

    /// Install (or replace) the validator for `name`.
    pub fn define_validator<F>(&mut self, name: impl Into<String>, validator: F)
    where
        F: Fn(&Value, &[String], &mut ErrorBuilder) + Send + Sync + 'static,
    {
        self.validators.insert(name.into(), Arc::new(validator));
    }

    /// Store a raw rule list, or install a validator when one is passed.
    /// Returns the rule list now stored for `name`.
    pub fn define_validation_rules(
        &mut self,
        name: impl Into<String>,
        rules: impl Into<ValidationRules>,
    ) -> &[String] {
        let name = name.into();
        match rules.into() {
            ValidationRules::Fields(fields) => {
                self.rules.insert(name.clone(), fields);
            }
            ValidationRules::Validator(validator) => {
                self.validators.insert(name.clone(), validator);
            }
        }
        self.validation_rules(&name)
    }

    /// The stored rule list for `name`, empty when none was stored.
    pub fn validation_rules(&self, name: &str) -> &[String] {
        self.rules.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get_schema(&self, name: &str) -> Option<&FieldMap> {
        self.schemas.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// True when `descriptor` is an array marker or names a registered
    /// schema, i.e. when coercion would recurse or iterate.
    pub fn is_reference(&self, descriptor: &str) -> bool {
        if descriptor.is_empty() {
            return false;
        }
        descriptor.starts_with('[') || self.schemas.contains_key(descriptor)
    }

    /// Registered schema names, sorted.
    pub fn schema_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }

    pub(crate) fn defaults_provider(&self, name: &str) -> Option<&DefaultsProvider> {
        self.defaults.get(name)
    }

    pub(crate) fn validator(&self, name: &str) -> Option<&Validator> {
        self.validators.get(name)
    }
}

impl fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("schemas", &self.schema_names())
            .field("defaults", &self.defaults.len())
            .field("validators", &self.validators.len())
            .field("rules", &self.rules.len())
            .field("resources", &self.resources.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Primitive;

    fn person() -> FieldMap {
        FieldMap::new()
            .field("name", "string(20)")
            .field("age", Primitive::Number)
    }

    #[test]
    fn test_define_returns_stored_fields() {
        let mut registry = SchemaRegistry::new();
        let stored = registry.define("person", person());
        assert_eq!(stored.names().collect::<Vec<_>>(), vec!["name", "age"]);
        assert_eq!(registry.schema_count(), 1);
    }

    #[test]
    fn test_lookup_unknown_is_none() {
        let registry = SchemaRegistry::new();
        assert!(registry.get_schema("ghost").is_none());
        assert!(!registry.contains("ghost"));
    }

    #[test]
    fn test_redefinition_replaces() {
        let mut registry = SchemaRegistry::new();
        registry.define("person", person());
        registry.define("person", FieldMap::new().field("email", "string"));
        let fields = registry.get_schema("person").unwrap();
        assert_eq!(fields.names().collect::<Vec<_>>(), vec!["email"]);
        assert_eq!(registry.schema_count(), 1);
    }

    #[test]
    fn test_redefinition_keeps_providers() {
        let mut registry = SchemaRegistry::new();
        registry.define_defaults("person", |_, _| Some(Value::from("x")));
        registry.define("person", person());
        registry.define("person", person());
        assert!(registry.defaults_provider("person").is_some());
    }

    #[test]
    fn test_field_map_insert_keeps_position() {
        let mut fields = person();
        fields.insert("name", "text");
        assert_eq!(fields.names().collect::<Vec<_>>(), vec!["name", "age"]);
        assert_eq!(fields.get("name").unwrap().to_string(), "text");
    }

    #[test]
    fn test_is_reference() {
        let mut registry = SchemaRegistry::new();
        registry.define("address", FieldMap::new().field("city", "string"));
        assert!(registry.is_reference("[int]"));
        assert!(registry.is_reference("address"));
        assert!(!registry.is_reference("string"));
        assert!(!registry.is_reference("ghost"));
        assert!(!registry.is_reference(""));
    }

    #[test]
    fn test_validation_rules_list() {
        let mut registry = SchemaRegistry::new();
        assert!(registry.validation_rules("person").is_empty());
        let stored = registry.define_validation_rules("person", vec!["name", "age"]);
        assert_eq!(stored, ["name".to_string(), "age".to_string()]);
        assert_eq!(registry.validation_rules("person").len(), 2);
    }

    #[test]
    fn test_validation_rules_validator_installs_function() {
        let mut registry = SchemaRegistry::new();
        let validator: Validator = Arc::new(|_: &Value, _: &[String], errors: &mut ErrorBuilder| {
            errors.add("name");
        });
        let stored = registry.define_validation_rules("person", validator);
        assert!(stored.is_empty());
        assert!(registry.validator("person").is_some());
    }

    #[test]
    fn test_schema_names_sorted() {
        let mut registry = SchemaRegistry::new();
        registry.define("zeta", FieldMap::new());
        registry.define("alpha", FieldMap::new());
        assert_eq!(registry.schema_names(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_registry_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SchemaRegistry>();
    }
}
