//! # modelkit-cli — modelkit Command-Line Interface
//!
//! A clap-based front end over the schema engine, for inspecting schema
//! documents and trying coercion and validation against sample payloads.
//!
//! ## Subcommands
//!
//! - `describe`: list schemas, fields and descriptors
//! - `defaults`: print a schema's default instance
//! - `coerce`: coerce a JSON/YAML payload into a schema instance
//! - `validate`: coerce, validate and print the error aggregate
//! - `paginate`: page arithmetic and link rendering
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from handlers. Handlers return their
//!   output as a `String` so they can be tested without a process.
//! - Handlers delegate to the library crates; no business logic here.

pub mod coerce;
pub mod describe;
pub mod paginate;
pub mod schemas;
pub mod validate;
