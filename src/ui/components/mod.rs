//! Plain-text section renderers.
//!
//! Each component writes one part of the page into a `String`. Highlighted
//! match ranges are wrapped in brackets; RTL layouts are marked, not mirrored.

mod cart;
mod filters;
mod header;
mod search;

pub use cart::render_cart;
pub use filters::render_filters;
pub use header::{render_header, render_menu, render_promo};
pub use search::render_search;

use std::fmt::{self, Write};

/// Width of section rules.
const RULE_WIDTH: usize = 40;

fn render_rule(out: &mut String) -> fmt::Result {
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))
}

fn render_title(out: &mut String, title: &str) -> fmt::Result {
    render_rule(out)?;
    writeln!(out, "{title}")?;
    render_rule(out)
}
