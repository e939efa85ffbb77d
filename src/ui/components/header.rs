//! Header badges, promo banner and menu.

use super::render_title;
use crate::ui::viewmodel::{HeaderInfo, MenuView, PromoView};
use std::fmt::{self, Write};

pub fn render_promo(out: &mut String, promo: &PromoView) -> fmt::Result {
    write!(out, "[{}/{}] {}", promo.index + 1, promo.count, promo.text)?;
    if let Some(href) = &promo.href {
        write!(out, " ({href})")?;
    }
    if let Some(paused) = &promo.paused_label {
        write!(out, " [{paused}]")?;
    }
    writeln!(out)
}

pub fn render_header(out: &mut String, header: &HeaderInfo, rtl: bool) -> fmt::Result {
    let direction = if rtl { " [rtl]" } else { "" };
    writeln!(out, "{} | bag: {}{direction}", header.wishlist_label, header.cart_count)
}

pub fn render_menu(out: &mut String, menu: &MenuView) -> fmt::Result {
    render_title(out, &menu.title)?;
    if let Some(back) = &menu.back_label {
        writeln!(out, "< {back}")?;
    }
    if !menu.path.is_empty() {
        writeln!(out, "{}", menu.path.join(" > "))?;
    }
    Ok(())
}
