//! # modelkit CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use clap::Parser;

/// modelkit: schema-driven model coercion and validation.
///
/// Loads schema definition documents, builds default instances, coerces
/// and validates payloads, and computes pagination.
#[derive(Parser, Debug)]
#[command(name = "modelkit", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// List schemas, fields and descriptors.
    Describe(modelkit_cli::describe::DescribeArgs),
    /// Print a schema's default instance as JSON.
    Defaults(modelkit_cli::coerce::DefaultsArgs),
    /// Coerce a payload into a schema instance.
    Coerce(modelkit_cli::coerce::CoerceArgs),
    /// Coerce and validate a payload; exits non-zero on errors.
    Validate(modelkit_cli::validate::ValidateArgs),
    /// Compute paging state and page links.
    Paginate(modelkit_cli::paginate::PaginateArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let output = match cli.command {
        Commands::Describe(args) => modelkit_cli::describe::run(&args)?,
        Commands::Defaults(args) => modelkit_cli::coerce::run_defaults(&args)?,
        Commands::Coerce(args) => modelkit_cli::coerce::run_coerce(&args)?,
        Commands::Validate(args) => {
            let report = modelkit_cli::validate::run(&args)?;
            println!("{}", report.output);
            if report.has_errors {
                tracing::info!(schema = %args.name, "validation failed");
                std::process::exit(1);
            }
            return Ok(());
        }
        Commands::Paginate(args) => modelkit_cli::paginate::run(&args)?,
    };

    println!("{}", output.trim_end());
    Ok(())
}
