//! # Describe Subcommand
//!
//! Lists every schema in a definition document with its fields, their
//! descriptors and the behavior each descriptor resolved to.

use clap::Args;
use modelkit_schema::SchemaRegistry;

use crate::schemas::SchemaSource;

/// Arguments for the describe subcommand.
#[derive(Args, Debug)]
pub struct DescribeArgs {
    #[command(flatten)]
    pub source: SchemaSource,

    /// Only describe this schema.
    pub name: Option<String>,
}

pub fn run(args: &DescribeArgs) -> anyhow::Result<String> {
    let registry = args.source.load(None)?;
    match &args.name {
        Some(name) => {
            crate::schemas::require_schema(&registry, name)?;
            Ok(describe_schema(&registry, name))
        }
        None => Ok(registry
            .schema_names()
            .into_iter()
            .map(|name| describe_schema(&registry, name))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

fn describe_schema(registry: &SchemaRegistry, name: &str) -> String {
    let mut lines = vec![name.to_string()];
    if let Some(fields) = registry.get_schema(name) {
        let width = fields.names().map(str::len).max().unwrap_or(0);
        lines.extend(fields.iter().map(|(field, descriptor)| {
            format!("  {field:<width$}  {descriptor}  ({:?})", descriptor.kind())
        }));
    }
    let rules = registry.validation_rules(name);
    if !rules.is_empty() {
        lines.push(format!("  rules: {}", rules.join(", ")));
    }
    lines.iter().map(|line| format!("{line}\n")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelkit_schema::FieldMap;

    #[test]
    fn test_describe_schema_lines() {
        let mut registry = SchemaRegistry::new();
        registry.define("user", FieldMap::new().field("name", "string(5)").field("age", "int"));
        registry.define_validation_rules("user", vec!["name"]);
        let out = describe_schema(&registry, "user");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "user");
        assert!(lines[1].starts_with("  name  string(5)"));
        assert!(lines[2].starts_with("  age   int"));
        assert_eq!(lines[3], "  rules: name");
        assert!(out.ends_with('\n'));
    }
}
