//! # modelkit-schema — Schema Registry, Coercion & Validation
//!
//! Named, ordered field definitions and the operations that run against
//! them.
//!
//! ## Registration (`registry`, `descriptor`, `document`)
//!
//! [`SchemaRegistry`] maps schema names to a [`FieldMap`] of parsed
//! [`TypeDescriptor`]s, with an optional defaults provider and validator
//! per schema. Schemas can be registered in code or loaded from a YAML
//! [`SchemaDocument`].
//!
//! ## Instances (`defaults`, `coerce`)
//!
//! - [`SchemaRegistry::build_defaults`] produces a fresh zero-valued
//!   instance.
//! - [`SchemaRegistry::coerce`] normalizes arbitrary input into an instance
//!   whose fields exactly match the schema. It never fails; unknown schemas
//!   yield `None`.
//!
//! ## Validation (`dispatch`, `aggregate`, `resource`)
//!
//! [`SchemaRegistry::validate`] runs the schema's validator and returns an
//! [`ErrorBuilder`], which resolves `@` resource references through a
//! host [`ResourceLookup`] and serializes to JSON.
//!
//! ## Crate Policy
//!
//! - Depends only on `modelkit-core` internally.
//! - The registry is an explicit value, never a global. Build it through
//!   `&mut`, then share it by reference; it is `Send + Sync`.
//! - No `.unwrap()` outside tests.

pub mod aggregate;
pub mod coerce;
pub mod defaults;
pub mod descriptor;
pub mod dispatch;
pub mod document;
pub mod registry;
pub mod resource;

pub use aggregate::{ErrorBuilder, ErrorRecord, ResourceFn, RESOURCE_MARKER};
pub use defaults::MAX_NESTING_DEPTH;
pub use descriptor::{DescriptorKind, ElementType, Primitive, TokenKind, TypeDescriptor};
pub use dispatch::{per_field, required_fields, FieldVerdict};
pub use document::{SchemaDefinition, SchemaDocument};
pub use registry::{
    DefaultsMode, DefaultsProvider, FieldMap, SchemaRegistry, ValidationRules, Validator,
};
pub use resource::{ResourceLookup, StaticResources};
