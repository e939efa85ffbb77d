//! Top-level text renderer.
//!
//! ```text
//! AppState → compute_viewmodel → UIViewModel → render → String
//! ```

use crate::ui::components;
use crate::ui::viewmodel::UIViewModel;
use std::fmt;

/// Renders the view model as plain text, one section after another.
#[must_use]
pub fn render(vm: &UIViewModel) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = render_into(&mut out, vm);
    out
}

fn render_into(out: &mut String, vm: &UIViewModel) -> fmt::Result {
    if let Some(promo) = &vm.promo {
        components::render_promo(out, promo)?;
    }
    components::render_header(out, &vm.header, vm.rtl)?;

    if let Some(menu) = &vm.menu {
        components::render_menu(out, menu)?;
    }
    if let Some(search) = &vm.search {
        components::render_search(out, search)?;
    }
    if let Some(cart) = &vm.cart {
        components::render_cart(out, cart)?;
    }
    if let Some(filters) = &vm.filters {
        components::render_filters(out, filters)?;
    }
    if let Some(login) = &vm.login {
        out.push_str(login);
        out.push('\n');
    }
    Ok(())
}
