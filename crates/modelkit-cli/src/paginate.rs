//! # Paginate Subcommand
//!
//! Prints the paging state for a list together with its prev/next and
//! page links.

use anyhow::Context;
use clap::Args;
use modelkit_paging::{PageLink, Pagination};
use serde::Serialize;

/// Arguments for the paginate subcommand.
#[derive(Args, Debug)]
pub struct PaginateArgs {
    /// Total number of items.
    #[arg(long)]
    pub items: u64,

    /// Current page, 1-based.
    #[arg(long, default_value_t = 1)]
    pub page: u64,

    /// Items per page.
    #[arg(long, default_value_t = 10)]
    pub max: u64,

    /// Render at most this many page links around the current page.
    #[arg(long)]
    pub window: Option<u64>,

    /// Link format; `{0}` is replaced by the page number.
    #[arg(long)]
    pub format: Option<String>,
}

#[derive(Serialize)]
struct PaginationReport {
    pagination: Pagination,
    prev: PageLink,
    next: PageLink,
    links: Vec<PageLink>,
}

pub fn run(args: &PaginateArgs) -> anyhow::Result<String> {
    let pagination = Pagination::new(args.items, args.page, args.max, args.format.as_deref());
    let links = match args.window {
        Some(window) => pagination.render_window(window),
        None => pagination.render(),
    };
    let report = PaginationReport {
        prev: pagination.prev(),
        next: pagination.next(),
        links,
        pagination,
    };
    serde_json::to_string_pretty(&report).context("failed to serialize pagination")
}
