//! Pure reducer for [`UiState`].

use super::actions::UiAction;
use super::state::{Overlay, UiState};

/// Computes the state that follows `action`.
///
/// Pure: same inputs, same output, no side effects. Actions that do not
/// apply (closing a closed overlay, advancing a paused banner) return a state
/// equal to the input.
#[must_use]
pub fn reduce(state: &UiState, action: &UiAction) -> UiState {
    let mut next = state.clone();

    match action {
        UiAction::Open(overlay) => open_exclusive(&mut next, *overlay),
        UiAction::Close(overlay) => close(&mut next, *overlay),
        UiAction::Toggle(overlay) => {
            if state.is_open(*overlay) {
                close(&mut next, *overlay);
            } else {
                open_exclusive(&mut next, *overlay);
            }
        }
        UiAction::CloseAll => {
            for overlay in Overlay::ALL {
                close(&mut next, overlay);
            }
        }

        UiAction::NavigateMenu(category) => {
            if next.menu_open {
                next.menu_path.push(category.clone());
                next.menu_level = next.menu_path.len();
            }
        }
        UiAction::BackMenu => {
            next.menu_path.pop();
            next.menu_level = next.menu_path.len();
        }

        UiAction::TogglePromoPause => next.promo.paused = !next.promo.paused,
        UiAction::ClosePromoBanner => next.promo.visible = false,
        UiAction::AdvancePromo => {
            let promo = &mut next.promo;
            if promo.visible && !promo.paused && promo.message_count > 0 {
                promo.index = (promo.index + 1) % promo.message_count;
            }
        }
        UiAction::ShowPromo(index) => {
            if *index < next.promo.message_count {
                next.promo.index = *index;
            }
        }

        UiAction::ToggleWishlist(product_id) => {
            if !next.wishlist.remove(product_id) {
                next.wishlist.insert(product_id.clone());
            }
        }
        UiAction::SetWishlist(ids) => next.wishlist = ids.iter().cloned().collect(),

        UiAction::ToggleFacet { facet, value } => {
            let selected = next.filters.facet_mut(*facet);
            if !selected.remove(value) {
                selected.insert(value.clone());
            }
        }
        UiAction::SetPriceMin(min) => {
            next.filters.price_range = next.filters.price_range.with_min(*min);
        }
        UiAction::SetPriceMax(max) => {
            next.filters.price_range = next.filters.price_range.with_max(*max);
        }
        UiAction::SetOnlineOnly(value) => next.filters.online_only = *value,
        UiAction::ClearFilters => next.filters = Default::default(),
        UiAction::ToggleFilterSection(section) => {
            if !next.expanded_sections.remove(section) {
                next.expanded_sections.insert(*section);
            }
        }

        UiAction::SetReducedMotion(value) => next.reduced_motion = *value,
    }

    next
}

fn open_exclusive(state: &mut UiState, overlay: Overlay) {
    for other in Overlay::ALL {
        if other != overlay {
            close(state, other);
        }
    }

    if !state.is_open(overlay) {
        state.set_open(overlay, true);
        if overlay == Overlay::Menu {
            reset_menu(state);
        }
    }
}

fn close(state: &mut UiState, overlay: Overlay) {
    state.set_open(overlay, false);
    if overlay == Overlay::Menu {
        reset_menu(state);
    }
}

fn reset_menu(state: &mut UiState) {
    state.menu_level = 0;
    state.menu_path.clear();
}
