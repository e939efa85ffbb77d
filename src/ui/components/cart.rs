//! Cart drawer.

use super::{render_rule, render_title};
use crate::ui::viewmodel::CartDrawer;
use std::fmt::{self, Write};

pub fn render_cart(out: &mut String, cart: &CartDrawer) -> fmt::Result {
    render_title(out, &cart.title)?;

    if let Some(empty) = &cart.empty_message {
        writeln!(out, "{empty}")?;
    }

    for line in &cart.lines {
        let minus = if line.can_decrement { "-" } else { " " };
        let plus = if line.can_increment { "+" } else { " " };
        write!(out, "{} [{minus} {} {plus}] {}", line.title, line.quantity, line.line_total)?;
        if let Some(updating) = &line.updating {
            write!(out, " ({updating})")?;
        }
        writeln!(out)?;
        if let Some(error) = &line.error {
            writeln!(out, "  ! {error}")?;
        }
    }

    for error in &cart.errors {
        writeln!(out, "! {error}")?;
    }

    render_rule(out)?;
    writeln!(out, "{}: {}", cart.subtotal_label, cart.subtotal)?;
    if !cart.discounts.is_empty() {
        writeln!(out, "{}", cart.discounts.join(", "))?;
    }
    writeln!(out, "{} ({}%)", cart.free_shipping_message, cart.free_shipping_percent)?;
    if let Some(url) = &cart.checkout_url {
        writeln!(out, "{}: {url}", cart.checkout_label)?;
    }
    Ok(())
}
