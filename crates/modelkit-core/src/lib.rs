//! # modelkit-core — Foundational Types for modelkit
//!
//! This crate is the leaf of the modelkit workspace. It defines the data
//! model that the schema engine coerces into and out of, plus the lenient
//! parsing helpers the coercion rules are written against.
//!
//! ## Key Design Principles
//!
//! 1. **One closed value type.** [`Value`] covers every shape an input
//!    model can take: null, booleans, a single `f64` number type, strings,
//!    UTC dates, arrays, ordered records, and deferred (lazily computed)
//!    values. Wire payloads decoded by `serde_json` convert into it
//!    losslessly.
//!
//! 2. **Insertion-ordered records.** [`Record`] keeps keys in insertion
//!    order so schema field order survives defaulting and coercion.
//!
//! 3. **Parsing never fails.** [`parse_float`] and [`parse_int`] read the
//!    longest numeric prefix and fall back to zero. [`parse_date`] returns
//!    `None` for anything it does not recognize.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `modelkit-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod parse;
pub mod temporal;
pub mod text;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use error::ModelkitError;
pub use parse::{parse_float, parse_int};
pub use temporal::{format_date, from_epoch_millis, parse_date};
pub use text::{limit_chars, TRUNCATION_MARKER};
pub use value::{Deferred, Record, Value};
