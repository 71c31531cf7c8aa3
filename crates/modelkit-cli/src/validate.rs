//! # Validate Subcommand
//!
//! Coerces a payload, runs the schema's validator against the result and
//! prints the error aggregate as a JSON array.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use modelkit_core::Value;
use modelkit_schema::{ResourceLookup, StaticResources};

use crate::schemas::{read_input, require_schema, SchemaSource};

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub source: SchemaSource,

    /// Schema name.
    pub name: String,

    /// JSON or YAML payload to validate.
    #[arg(long, value_name = "FILE")]
    pub input: PathBuf,

    /// Resource file (`file -> key -> text`) for error messages.
    #[arg(long, value_name = "FILE")]
    pub resources: Option<PathBuf>,

    /// Resource file name to read messages from.
    #[arg(long, default_value = "")]
    pub resource_name: String,

    /// Prefix prepended to every resource key.
    #[arg(long, default_value = "")]
    pub prefix: String,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pub pretty: bool,
}

/// Rendered aggregate plus whether it holds any error.
#[derive(Debug)]
pub struct ValidationReport {
    pub output: String,
    pub has_errors: bool,
}

pub fn run(args: &ValidateArgs) -> anyhow::Result<ValidationReport> {
    let resources = match &args.resources {
        Some(path) => {
            let resources = StaticResources::from_path(path)
                .with_context(|| format!("failed to load resources from {}", path.display()))?;
            Some(Arc::new(resources) as Arc<dyn ResourceLookup>)
        }
        None => None,
    };

    let registry = args.source.load(resources)?;
    require_schema(&registry, &args.name)?;

    let input = read_input(&args.input)?;
    let model = registry
        .coerce(&args.name, Some(&input))
        .map(Value::Object)
        .with_context(|| format!("schema `{}` could not be coerced", args.name))?;

    let mut errors = registry.validate(&args.name, &model);
    errors.resource(args.resource_name.as_str(), args.prefix.as_str());
    let output = errors.json(args.pretty).context("failed to serialize errors")?;
    tracing::debug!(schema = %args.name, errors = errors.len(), "validation finished");

    Ok(ValidationReport {
        output,
        has_errors: errors.has_error(),
    })
}
