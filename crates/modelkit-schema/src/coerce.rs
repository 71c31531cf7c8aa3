//! # Model Coercion
//!
//! Normalizes an arbitrary, loosely-typed input into a fresh instance of a
//! registered schema. Every declared field is present in the result, in
//! declaration order, and holds a value of the declared type. Undeclared
//! input fields are dropped.
//!
//! Coercion never fails. Malformed values become zero values (`0`, `""`,
//! `false`), null, or the schema's fill default, depending on the target
//! type. The input is never mutated.

use modelkit_core::{
    from_epoch_millis, limit_chars, parse_date, parse_float, parse_int, Record, Value,
    TRUNCATION_MARKER,
};

use crate::defaults::MAX_NESTING_DEPTH;
use crate::descriptor::{ElementType, Primitive, TokenKind, TypeDescriptor};
use crate::registry::{DefaultsMode, DefaultsProvider, SchemaRegistry};

/// Per-field state threaded through the coercion helpers.
struct FieldContext<'a> {
    schema: &'a str,
    field: &'a str,
    provider: Option<&'a DefaultsProvider>,
    depth: usize,
}

impl FieldContext<'_> {
    /// The provider's value for a missing or unusable field.
    fn fill(&self) -> Option<Value> {
        self.provider
            .and_then(|p| p(self.field, DefaultsMode::Fill))
            .map(Value::resolved)
    }
}

impl SchemaRegistry {
    /// Coerce `input` into an instance of `name`.
    ///
    /// Returns `None` only when `name` is not registered. A `None` or null
    /// input yields the schema's defaults; a non-object input is treated as
    /// an object with no fields.
    pub fn coerce(&self, name: &str, input: Option<&Value>) -> Option<Record> {
        self.coerce_at(name, input, 0)
    }

    fn coerce_at(&self, name: &str, input: Option<&Value>, depth: usize) -> Option<Record> {
        let fields = self.get_schema(name)?;

        let resolved;
        let model = match input {
            None => return self.defaults_at(name, depth),
            Some(Value::Deferred(d)) => {
                resolved = d.resolve().resolved();
                &resolved
            }
            Some(value) => value,
        };
        if model.is_null() {
            return self.defaults_at(name, depth);
        }

        tracing::trace!(schema = %name, depth, "coercing model");

        let empty = Record::new();
        let source = model.as_object().unwrap_or(&empty);
        let provider = self.defaults_provider(name);

        let mut instance = Record::with_capacity(fields.len());
        for (field, descriptor) in fields.iter() {
            let ctx = FieldContext {
                schema: name,
                field,
                provider,
                depth,
            };
            let raw = match source.get(field) {
                Some(value) => value.clone().resolved(),
                None => ctx.fill().unwrap_or_else(|| Value::String(String::new())),
            };
            instance.insert(field, self.coerce_field(descriptor, raw, &ctx));
        }
        Some(instance)
    }

    fn coerce_field(&self, descriptor: &TypeDescriptor, raw: Value, ctx: &FieldContext<'_>) -> Value {
        match descriptor {
            TypeDescriptor::Primitive(primitive) => self.coerce_primitive(*primitive, raw, ctx),
            TypeDescriptor::Factory(factory) => match Primitive::of_shape(&factory.resolve()) {
                Some(primitive) => self.coerce_primitive(primitive, raw, ctx),
                None => to_opaque(raw),
            },
            TypeDescriptor::Token { kind, .. } => match *kind {
                TokenKind::Text { size } => to_text(&raw, size),
                TokenKind::Integer => Value::Number(parse_int(&raw)),
                TokenKind::Float => Value::Number(parse_float(&raw)),
                TokenKind::Boolean => Value::Bool(to_bool(&raw)),
                TokenKind::Date => to_date(raw, ctx),
                TokenKind::Object => to_object(raw),
                TokenKind::Array => to_untyped_array(raw, ctx),
                TokenKind::Opaque => to_opaque(raw),
            },
            TypeDescriptor::ArrayOf(element) => self.to_typed_array(element, raw, ctx),
            TypeDescriptor::SchemaRef(target) => self.nested(target, &raw, ctx),
        }
    }

    fn coerce_primitive(&self, primitive: Primitive, raw: Value, ctx: &FieldContext<'_>) -> Value {
        match primitive {
            Primitive::Number => Value::Number(parse_float(&raw)),
            Primitive::Boolean => Value::Bool(to_bool(&raw)),
            Primitive::String => Value::String(raw.to_text()),
            Primitive::Date => to_date(raw, ctx),
            Primitive::Object => to_object(raw),
            Primitive::Array => to_untyped_array(raw, ctx),
        }
    }

    fn to_typed_array(&self, element: &ElementType, raw: Value, ctx: &FieldContext<'_>) -> Value {
        let items = match raw {
            Value::Array(items) => items,
            _ => match ctx.fill() {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            },
        };
        let coerced = items
            .into_iter()
            .map(Value::resolved)
            .map(|item| match element {
                ElementType::String => Value::String(item.to_text()),
                ElementType::Boolean => Value::Bool(to_bool(&item)),
                ElementType::Integer => Value::Number(parse_int(&item)),
                ElementType::Number => Value::Number(parse_float(&item)),
                ElementType::Schema(target) => self.nested(target, &item, ctx),
            })
            .collect();
        Value::Array(coerced)
    }

    fn nested(&self, target: &str, raw: &Value, ctx: &FieldContext<'_>) -> Value {
        if ctx.depth >= MAX_NESTING_DEPTH {
            tracing::warn!(
                schema = %ctx.schema,
                field = %ctx.field,
                target = %target,
                depth = ctx.depth,
                "nesting depth exceeded while coercing"
            );
            return Value::Null;
        }
        self.coerce_at(target, Some(raw), ctx.depth + 1)
            .map(Value::Object)
            .unwrap_or(Value::Null)
    }
}

fn to_bool(raw: &Value) -> bool {
    let text = raw.to_text().to_lowercase();
    text == "true" || text == "1"
}

fn to_text(raw: &Value, size: Option<usize>) -> Value {
    let text = raw.to_text();
    match size {
        Some(max) => Value::String(limit_chars(&text, max, TRUNCATION_MARKER)),
        None => Value::String(text),
    }
}

fn to_date(raw: Value, ctx: &FieldContext<'_>) -> Value {
    date_of(raw)
        .or_else(|| ctx.fill().and_then(date_of))
        .map(Value::Date)
        .unwrap_or(Value::Null)
}

fn date_of(raw: Value) -> Option<chrono::DateTime<chrono::Utc>> {
    match raw {
        Value::Date(date) => Some(date),
        Value::Number(millis) => from_epoch_millis(millis),
        Value::String(text) if !text.is_empty() => parse_date(&text),
        _ => None,
    }
}

fn to_object(raw: Value) -> Value {
    match raw {
        Value::Object(record) => Value::Object(record),
        _ => Value::Null,
    }
}

/// Non-array input falls back to the provider's fill value when that is an
/// array, else `[]`.
fn to_untyped_array(raw: Value, ctx: &FieldContext<'_>) -> Value {
    let items = match raw {
        Value::Array(items) => items,
        _ => match ctx.fill() {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
    };
    Value::Array(items.into_iter().map(Value::resolved).collect())
}

fn to_opaque(raw: Value) -> Value {
    match raw {
        Value::String(text) if !text.is_empty() => Value::String(text),
        _ => Value::Null,
    }
}
