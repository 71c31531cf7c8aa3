//! # Defaults & Coerce Subcommands
//!
//! Print a schema's default instance, or coerce a payload into one.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::schemas::{read_input, require_schema, to_json, SchemaSource};

/// Arguments for the defaults subcommand.
#[derive(Args, Debug)]
pub struct DefaultsArgs {
    #[command(flatten)]
    pub source: SchemaSource,

    /// Schema name.
    pub name: String,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pub pretty: bool,
}

/// Arguments for the coerce subcommand.
#[derive(Args, Debug)]
pub struct CoerceArgs {
    #[command(flatten)]
    pub source: SchemaSource,

    /// Schema name.
    pub name: String,

    /// JSON or YAML payload. Without it the schema's defaults are printed.
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pub pretty: bool,
}

pub fn run_defaults(args: &DefaultsArgs) -> anyhow::Result<String> {
    let registry = args.source.load(None)?;
    require_schema(&registry, &args.name)?;
    let instance = registry
        .build_defaults(&args.name)
        .with_context(|| format!("schema `{}` has no defaults", args.name))?;
    to_json(instance, args.pretty)
}

pub fn run_coerce(args: &CoerceArgs) -> anyhow::Result<String> {
    let registry = args.source.load(None)?;
    require_schema(&registry, &args.name)?;
    let input = args.input.as_deref().map(read_input).transpose()?;
    let instance = registry
        .coerce(&args.name, input.as_ref())
        .with_context(|| format!("schema `{}` could not be coerced", args.name))?;
    tracing::debug!(schema = %args.name, fields = instance.len(), "payload coerced");
    to_json(instance, args.pretty)
}
