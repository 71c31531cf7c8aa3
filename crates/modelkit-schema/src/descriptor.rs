//! # Type Descriptors
//!
//! A field's declared type is parsed once, at definition time, into a
//! [`TypeDescriptor`]. Coercion and defaulting then match on the parsed
//! form instead of re-inspecting strings on every call.
//!
//! ## Grammar
//!
//! ```text
//! descriptor := token | token "(" size ")" | "[" element "]" | schema-name
//! ```
//!
//! Tokens are classified by case-insensitive *substring* membership, in a
//! fixed priority order:
//!
//! | Priority | Substrings | Kind |
//! |---|---|---|
//! | 1 | `string` `text` `varchar` `nvarchar` | text, optionally sized |
//! | 2 | `int` `byte` | integer |
//! | 2 | `number` `decimal` `float` `double` | float |
//! | 3 | `bool` | boolean |
//! | 4 | `date` `time` | date |
//! | 5 | `object` | object |
//! | 6 | `array` | untyped array |
//! | 7 | `binary` `data` `base64` | opaque |
//!
//! A token matching none of these names another schema. Because matching
//! is by substring, a schema named `Point` classifies as an integer and one
//! named `Context` as text; name schemas accordingly.
//!
//! Array elements (`[element]`) are matched *exactly* against
//! `string`/`varchar`/`text`, `bool`/`boolean`, `int`/`integer` and
//! `number`; anything else is an element schema name.

use std::fmt;

use chrono::Utc;
use modelkit_core::{Deferred, Record, Value};

const TEXT_TOKENS: &[&str] = &["string", "text", "varchar", "nvarchar"];
const INTEGER_TOKENS: &[&str] = &["int", "byte"];
const FLOAT_TOKENS: &[&str] = &["number", "decimal", "float", "double"];
const BOOLEAN_TOKENS: &[&str] = &["bool"];
const DATE_TOKENS: &[&str] = &["date", "time"];
const OBJECT_TOKENS: &[&str] = &["object"];
const ARRAY_TOKENS: &[&str] = &["array"];
const OPAQUE_TOKENS: &[&str] = &["binary", "data", "base64"];

/// Constructor-style primitive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// Always coerced with a float parse.
    Number,
    Boolean,
    /// Stringified without truncation.
    String,
    Date,
    Object,
    Array,
}

impl Primitive {
    /// The primitive a concrete value's shape corresponds to. `None` for
    /// null.
    pub fn of_shape(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(_) => Some(Primitive::Boolean),
            Value::Number(_) => Some(Primitive::Number),
            Value::String(_) => Some(Primitive::String),
            Value::Date(_) => Some(Primitive::Date),
            Value::Array(_) => Some(Primitive::Array),
            Value::Object(_) => Some(Primitive::Object),
            Value::Deferred(d) => Self::of_shape(&d.resolve()),
        }
    }

    pub fn zero_value(self) -> Value {
        match self {
            Primitive::Number => Value::Number(0.0),
            Primitive::Boolean => Value::Bool(false),
            Primitive::String => Value::String(String::new()),
            Primitive::Date => Value::Date(Utc::now()),
            Primitive::Object => Value::Object(Record::new()),
            Primitive::Array => Value::Array(Vec::new()),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Primitive::Number => "Number",
            Primitive::Boolean => "Boolean",
            Primitive::String => "String",
            Primitive::Date => "Date",
            Primitive::Object => "Object",
            Primitive::Array => "Array",
        }
    }
}

/// What a primitive token string resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Text, truncated to `size` characters when sized.
    Text { size: Option<usize> },
    /// Truncating integer parse.
    Integer,
    /// Float parse.
    Float,
    Boolean,
    Date,
    Object,
    /// Untyped array; elements are copied verbatim.
    Array,
    /// Binary-ish payload; defaults to null.
    Opaque,
}

impl TokenKind {
    /// Classify a token. `None` means the token names a schema.
    pub fn classify(token: &str) -> Option<Self> {
        let lower = token.to_lowercase();
        let contains_any = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));

        if contains_any(TEXT_TOKENS) {
            return Some(TokenKind::Text {
                size: parse_size(&lower),
            });
        }
        if contains_any(INTEGER_TOKENS) {
            return Some(TokenKind::Integer);
        }
        if contains_any(FLOAT_TOKENS) {
            return Some(TokenKind::Float);
        }
        if contains_any(BOOLEAN_TOKENS) {
            return Some(TokenKind::Boolean);
        }
        if contains_any(DATE_TOKENS) {
            return Some(TokenKind::Date);
        }
        if contains_any(OBJECT_TOKENS) {
            return Some(TokenKind::Object);
        }
        if contains_any(ARRAY_TOKENS) {
            return Some(TokenKind::Array);
        }
        if contains_any(OPAQUE_TOKENS) {
            return Some(TokenKind::Opaque);
        }
        None
    }

    pub fn zero_value(self) -> Value {
        match self {
            TokenKind::Text { .. } => Value::String(String::new()),
            TokenKind::Integer | TokenKind::Float => Value::Number(0.0),
            TokenKind::Boolean => Value::Bool(false),
            TokenKind::Date => Value::Date(Utc::now()),
            TokenKind::Object => Value::Object(Record::new()),
            TokenKind::Array => Value::Array(Vec::new()),
            TokenKind::Opaque => Value::Null,
        }
    }
}

/// `varchar(50)` → `Some(50)`. A missing or non-numeric size is `None`.
fn parse_size(lower: &str) -> Option<usize> {
    let open = lower.find('(')?;
    let inner = &lower[open + 1..];
    let inner = inner.strip_suffix(')').unwrap_or(inner);
    inner.trim().parse().ok()
}

/// Element type of a typed array (`[element]`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementType {
    String,
    Boolean,
    Integer,
    Number,
    /// Elements are coerced as instances of the named schema.
    Schema(String),
}

impl ElementType {
    pub fn parse(token: &str) -> Self {
        match token.to_lowercase().as_str() {
            "string" | "varchar" | "text" => ElementType::String,
            "bool" | "boolean" => ElementType::Boolean,
            "int" | "integer" => ElementType::Integer,
            "number" => ElementType::Number,
            _ => ElementType::Schema(token.to_string()),
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementType::String => f.write_str("string"),
            ElementType::Boolean => f.write_str("boolean"),
            ElementType::Integer => f.write_str("int"),
            ElementType::Number => f.write_str("number"),
            ElementType::Schema(name) => f.write_str(name),
        }
    }
}

/// A parsed field type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    /// `Number`, `Boolean`, `String`, `Date`, `Object` or `Array`.
    Primitive(Primitive),
    /// Zero-argument factory. Defaults to the factory's result; coerces
    /// according to the result's shape.
    Factory(Deferred),
    /// A primitive token string such as `int` or `string(50)`.
    Token {
        kind: TokenKind,
        /// The token as written, for display.
        source: String,
    },
    /// `[element]`.
    ArrayOf(ElementType),
    /// The name of another registered schema.
    SchemaRef(String),
}

/// The twelve behaviors a descriptor can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorKind {
    FunctionPrimitive,
    SizedString,
    UnsizedString,
    Integer,
    Float,
    Boolean,
    Date,
    Object,
    UntypedArray,
    TypedArray,
    Opaque,
    SchemaReference,
}

impl TypeDescriptor {
    /// Parse the string form of a descriptor. Never fails: unrecognized
    /// tokens are schema references.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text.len() >= 2 && text.starts_with('[') && text.ends_with(']') {
            let inner = text[1..text.len() - 1].trim();
            if inner.is_empty() {
                return TypeDescriptor::Token {
                    kind: TokenKind::Array,
                    source: text.to_string(),
                };
            }
            return TypeDescriptor::ArrayOf(ElementType::parse(inner));
        }

        match TokenKind::classify(text) {
            Some(kind) => TypeDescriptor::Token {
                kind,
                source: text.to_string(),
            },
            None => TypeDescriptor::SchemaRef(text.to_string()),
        }
    }

    /// Build a descriptor from a template value: numbers, booleans, dates,
    /// objects and arrays stand for their primitive, strings are parsed as
    /// descriptor text, null is opaque.
    pub fn from_template(value: &Value) -> Self {
        match value {
            Value::String(text) => Self::parse(text),
            Value::Deferred(d) => TypeDescriptor::Factory(d.clone()),
            other => match Primitive::of_shape(other) {
                Some(primitive) => TypeDescriptor::Primitive(primitive),
                None => TypeDescriptor::Token {
                    kind: TokenKind::Opaque,
                    source: "null".to_string(),
                },
            },
        }
    }

    /// Wrap a factory function.
    pub fn factory(f: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        TypeDescriptor::Factory(Deferred::new(f))
    }

    pub fn kind(&self) -> DescriptorKind {
        match self {
            TypeDescriptor::Primitive(_) | TypeDescriptor::Factory(_) => {
                DescriptorKind::FunctionPrimitive
            }
            TypeDescriptor::Token { kind, .. } => match kind {
                TokenKind::Text { size: Some(_) } => DescriptorKind::SizedString,
                TokenKind::Text { size: None } => DescriptorKind::UnsizedString,
                TokenKind::Integer => DescriptorKind::Integer,
                TokenKind::Float => DescriptorKind::Float,
                TokenKind::Boolean => DescriptorKind::Boolean,
                TokenKind::Date => DescriptorKind::Date,
                TokenKind::Object => DescriptorKind::Object,
                TokenKind::Array => DescriptorKind::UntypedArray,
                TokenKind::Opaque => DescriptorKind::Opaque,
            },
            TypeDescriptor::ArrayOf(_) => DescriptorKind::TypedArray,
            TypeDescriptor::SchemaRef(_) => DescriptorKind::SchemaReference,
        }
    }

    /// Names of schemas this descriptor recurses into.
    pub fn referenced_schema(&self) -> Option<&str> {
        match self {
            TypeDescriptor::SchemaRef(name) => Some(name),
            TypeDescriptor::ArrayOf(ElementType::Schema(name)) => Some(name),
            _ => None,
        }
    }
}

impl From<&str> for TypeDescriptor {
    fn from(text: &str) -> Self {
        TypeDescriptor::parse(text)
    }
}

impl From<String> for TypeDescriptor {
    fn from(text: String) -> Self {
        TypeDescriptor::parse(&text)
    }
}

impl From<Primitive> for TypeDescriptor {
    fn from(primitive: Primitive) -> Self {
        TypeDescriptor::Primitive(primitive)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Primitive(p) => f.write_str(p.name()),
            TypeDescriptor::Factory(_) => f.write_str("<factory>"),
            TypeDescriptor::Token { source, .. } => f.write_str(source),
            TypeDescriptor::ArrayOf(element) => write!(f, "[{element}]"),
            TypeDescriptor::SchemaRef(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_of(text: &str) -> DescriptorKind {
        TypeDescriptor::parse(text).kind()
    }

    #[test]
    fn test_text_family() {
        assert_eq!(kind_of("string"), DescriptorKind::UnsizedString);
        assert_eq!(kind_of("TEXT"), DescriptorKind::UnsizedString);
        assert_eq!(kind_of("nvarchar(50)"), DescriptorKind::SizedString);
        assert_eq!(
            TypeDescriptor::parse("varchar(50)"),
            TypeDescriptor::Token {
                kind: TokenKind::Text { size: Some(50) },
                source: "varchar(50)".into(),
            }
        );
    }

    #[test]
    fn test_unparseable_size_is_unsized() {
        assert_eq!(kind_of("string(abc)"), DescriptorKind::UnsizedString);
        assert_eq!(kind_of("string()"), DescriptorKind::UnsizedString);
    }

    #[test]
    fn test_numeric_split() {
        assert_eq!(kind_of("int"), DescriptorKind::Integer);
        assert_eq!(kind_of("Integer"), DescriptorKind::Integer);
        assert_eq!(kind_of("byte"), DescriptorKind::Integer);
        assert_eq!(kind_of("number"), DescriptorKind::Float);
        assert_eq!(kind_of("decimal"), DescriptorKind::Float);
        assert_eq!(kind_of("double"), DescriptorKind::Float);
    }

    #[test]
    fn test_remaining_tokens() {
        assert_eq!(kind_of("bool"), DescriptorKind::Boolean);
        assert_eq!(kind_of("Boolean"), DescriptorKind::Boolean);
        assert_eq!(kind_of("date"), DescriptorKind::Date);
        assert_eq!(kind_of("datetime"), DescriptorKind::Date);
        assert_eq!(kind_of("time"), DescriptorKind::Date);
        assert_eq!(kind_of("object"), DescriptorKind::Object);
        assert_eq!(kind_of("array"), DescriptorKind::UntypedArray);
        assert_eq!(kind_of("binary"), DescriptorKind::Opaque);
        assert_eq!(kind_of("base64"), DescriptorKind::Opaque);
    }

    #[test]
    fn test_priority_is_load_bearing() {
        // Contains both "string" and "int": text wins.
        assert_eq!(kind_of("stringint"), DescriptorKind::UnsizedString);
        // Contains "int" and "date": numeric wins.
        assert_eq!(kind_of("intdate"), DescriptorKind::Integer);
        // Substring matching catches schema-looking names.
        assert_eq!(kind_of("Point"), DescriptorKind::Integer);
    }

    #[test]
    fn test_schema_reference_fallthrough() {
        assert_eq!(
            TypeDescriptor::parse("Address"),
            TypeDescriptor::SchemaRef("Address".into())
        );
        assert_eq!(kind_of("customer"), DescriptorKind::SchemaReference);
    }

    #[test]
    fn test_array_markers() {
        assert_eq!(
            TypeDescriptor::parse("[int]"),
            TypeDescriptor::ArrayOf(ElementType::Integer)
        );
        assert_eq!(
            TypeDescriptor::parse("[Boolean]"),
            TypeDescriptor::ArrayOf(ElementType::Boolean)
        );
        assert_eq!(
            TypeDescriptor::parse("[Address]"),
            TypeDescriptor::ArrayOf(ElementType::Schema("Address".into()))
        );
        assert_eq!(kind_of("[]"), DescriptorKind::UntypedArray);
        // Element matching is exact, not by substring.
        assert_eq!(
            TypeDescriptor::parse("[float]"),
            TypeDescriptor::ArrayOf(ElementType::Schema("float".into()))
        );
    }

    #[test]
    fn test_unbalanced_bracket_is_schema_name() {
        assert_eq!(kind_of("[int"), DescriptorKind::Integer);
        assert_eq!(kind_of("[user"), DescriptorKind::SchemaReference);
    }

    #[test]
    fn test_from_template() {
        assert_eq!(
            TypeDescriptor::from_template(&Value::Number(5.0)),
            TypeDescriptor::Primitive(Primitive::Number)
        );
        assert_eq!(
            TypeDescriptor::from_template(&Value::Array(vec![])),
            TypeDescriptor::Primitive(Primitive::Array)
        );
        assert_eq!(
            TypeDescriptor::from_template(&Value::from("string(4)")).kind(),
            DescriptorKind::SizedString
        );
        assert_eq!(
            TypeDescriptor::from_template(&Value::Null).kind(),
            DescriptorKind::Opaque
        );
    }

    #[test]
    fn test_display_renders_grammar() {
        assert_eq!(TypeDescriptor::parse("string(3)").to_string(), "string(3)");
        assert_eq!(TypeDescriptor::parse("[integer]").to_string(), "[int]");
        assert_eq!(TypeDescriptor::from(Primitive::Date).to_string(), "Date");
        assert_eq!(TypeDescriptor::parse("Address").to_string(), "Address");
    }

    #[test]
    fn test_referenced_schema() {
        assert_eq!(
            TypeDescriptor::parse("[Line]").referenced_schema(),
            Some("Line")
        );
        assert_eq!(TypeDescriptor::parse("Line").referenced_schema(), Some("Line"));
        assert_eq!(TypeDescriptor::parse("[int]").referenced_schema(), None);
    }
}
