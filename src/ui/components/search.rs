//! Search overlay.

use super::render_title;
use crate::ui::helpers::apply_highlights;
use crate::ui::viewmodel::{ResultSection, SearchBody, SearchPanel};
use std::fmt::{self, Write};

pub fn render_search(out: &mut String, panel: &SearchPanel) -> fmt::Result {
    let input = if panel.term.is_empty() {
        panel.placeholder.as_str()
    } else {
        panel.term.as_str()
    };
    render_title(out, &format!("> {input}"))?;

    match &panel.body {
        SearchBody::Prompt {
            message,
            trending_title,
            trending,
        } => {
            writeln!(out, "{message}")?;
            if !trending.is_empty() {
                writeln!(out, "{trending_title}: {}", trending.join(", "))?;
            }
        }
        SearchBody::Searching { message, previous } => {
            writeln!(out, "{message}")?;
            render_sections(out, previous)?;
        }
        SearchBody::NoResults { message } => writeln!(out, "{message}")?,
        SearchBody::Failed { message, previous } => {
            writeln!(out, "! {message}")?;
            render_sections(out, previous)?;
        }
        SearchBody::Results {
            total_label,
            sections,
            suggestions_title,
            suggestions,
        } => {
            writeln!(out, "{total_label}")?;
            if !suggestions.is_empty() {
                writeln!(out, "{suggestions_title}: {}", suggestions.join(", "))?;
            }
            render_sections(out, sections)?;
        }
    }
    Ok(())
}

fn render_sections(out: &mut String, sections: &[ResultSection]) -> fmt::Result {
    for section in sections {
        writeln!(out, "{}", section.title)?;
        for item in &section.items {
            let heart = if item.wishlisted { " <3" } else { "" };
            let title = apply_highlights(&item.title, &item.highlight_ranges, "[", "]");
            match &item.price {
                Some(price) => writeln!(out, "  {title}  {price}{heart}  {}", item.path)?,
                None => writeln!(out, "  {title}{heart}  {}", item.path)?,
            }
        }
    }
    Ok(())
}
