//! # modelkit-paging — Pagination & Query Strings
//!
//! Helpers for rendering paged list views of schema instances.
//!
//! - [`Pagination`] computes page count, skip/take and prev/next state from
//!   an item total, and renders page links from a URL format such as
//!   `?page={0}`.
//! - [`UrlBuilder`] collects ordered query parameters and renders them as a
//!   percent-encoded query string.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `modelkit-*` crates.
//! - All arithmetic is total: a zero page size is treated as one.

pub mod pagination;
pub mod url;

pub use pagination::{PageLink, Pagination, DEFAULT_FORMAT, PAGE_PLACEHOLDER};
pub use url::UrlBuilder;
