//! Filter panel.

use super::render_title;
use crate::ui::viewmodel::FilterPanel;
use std::fmt::{self, Write};

pub fn render_filters(out: &mut String, panel: &FilterPanel) -> fmt::Result {
    match &panel.active_label {
        Some(active) => render_title(out, &format!("{} ({active})", panel.title))?,
        None => render_title(out, &panel.title)?,
    }

    for selection in &panel.selections {
        writeln!(out, "[x] {selection}")?;
    }
    writeln!(out, "{}: {} - {}", panel.price_label, panel.price_min, panel.price_max)?;
    if panel.online_only {
        writeln!(out, "[x] online only")?;
    }
    Ok(())
}
