//! Typed actions accepted by the UI store.

use super::state::{Facet, FilterSection, Overlay};
use serde::{Deserialize, Serialize};

/// Every way the UI state can change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum UiAction {
    /// Opens an overlay and closes every other one.
    Open(Overlay),
    /// Closes an overlay. No-op if already closed.
    Close(Overlay),
    /// Opens a closed overlay (closing the rest) or closes an open one.
    Toggle(Overlay),
    /// Closes every overlay. Bound to Escape.
    CloseAll,

    /// Drills into a menu category. Ignored while the menu is closed.
    NavigateMenu(String),
    /// Steps one menu level back out.
    BackMenu,

    TogglePromoPause,
    ClosePromoBanner,
    /// Rotates to the next promo message unless paused or hidden.
    AdvancePromo,
    /// Jumps to a promo message by index.
    ShowPromo(usize),

    ToggleWishlist(String),
    SetWishlist(Vec<String>),

    ToggleFacet { facet: Facet, value: String },
    SetPriceMin(u32),
    SetPriceMax(u32),
    SetOnlineOnly(bool),
    ClearFilters,
    ToggleFilterSection(FilterSection),

    SetReducedMotion(bool),
}
