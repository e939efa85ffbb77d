//! View model types.
//!
//! Computed by [`AppState::compute_viewmodel`](crate::app::AppState::compute_viewmodel)
//! and consumed by the renderer or by a host UI. Everything here is display
//! ready: strings are already translated, amounts already formatted.

use crate::domain::{HitKind, LineId};
use crate::store::{FilterSection, Overlay};

/// Complete view of the storefront chrome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UIViewModel {
    /// Layout direction for the active language.
    pub rtl: bool,

    pub reduced_motion: bool,

    /// Page scrolling is locked while any overlay is open.
    pub scroll_locked: bool,

    pub header: HeaderInfo,

    /// `None` once the shopper closed the banner or no messages are configured.
    pub promo: Option<PromoView>,

    pub open_overlay: Option<Overlay>,

    /// Present while the menu overlay is open.
    pub menu: Option<MenuView>,

    /// Present while the search overlay is open.
    pub search: Option<SearchPanel>,

    /// Present while the cart drawer is open.
    pub cart: Option<CartDrawer>,

    /// Present while the filter panel is open.
    pub filters: Option<FilterPanel>,

    /// Login overlay title, while open.
    pub login: Option<String>,
}

/// Always-visible header badges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub wishlist_label: String,
    pub wishlist_count: usize,
    /// Items in the cart, following optimistic edits.
    pub cart_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoView {
    pub text: String,
    pub href: Option<String>,
    pub index: usize,
    pub count: usize,
    /// Translated "paused" marker, present while rotation is paused.
    pub paused_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuView {
    pub title: String,
    /// Categories drilled into, outermost first.
    pub path: Vec<String>,
    /// Back button label, present below the top level.
    pub back_label: Option<String>,
}

/// Search overlay contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPanel {
    /// Input value as typed.
    pub term: String,
    pub placeholder: String,
    pub body: SearchBody,
}

/// What the search overlay shows below the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchBody {
    /// Nothing searched yet.
    Prompt {
        message: String,
        trending_title: String,
        trending: Vec<String>,
    },

    /// Request in flight. The last good sections stay visible under the indicator.
    Searching {
        message: String,
        previous: Vec<ResultSection>,
    },

    NoResults { message: String },

    /// Last request failed. Submitting again retries.
    Failed {
        message: String,
        previous: Vec<ResultSection>,
    },

    Results {
        total_label: String,
        sections: Vec<ResultSection>,
        suggestions_title: String,
        suggestions: Vec<String>,
    },
}

/// One non-empty result bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSection {
    pub kind: HitKind,
    pub title: String,
    pub items: Vec<ResultItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultItem {
    pub title: String,
    pub handle: String,
    /// Where selecting the item navigates.
    pub path: String,
    /// Formatted price with currency, products only.
    pub price: Option<String>,
    pub wishlisted: bool,

    /// Character ranges of the title matching the term.
    ///
    /// Each tuple is `(start, end)` in character indices, end exclusive.
    pub highlight_ranges: Vec<(usize, usize)>,
}

/// Cart drawer contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartDrawer {
    pub title: String,
    pub lines: Vec<CartLineView>,
    /// Shown instead of lines when the cart is empty.
    pub empty_message: Option<String>,
    pub subtotal_label: String,
    /// Formatted subtotal with currency.
    pub subtotal: String,
    /// Applicable discount codes only.
    pub discounts: Vec<String>,
    pub free_shipping_message: String,
    /// 0 to 100.
    pub free_shipping_percent: u8,
    /// Errors for lines that no longer exist.
    pub errors: Vec<String>,
    pub checkout_label: String,
    pub checkout_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineView {
    pub id: LineId,
    pub title: String,
    pub quantity: u32,
    pub line_total: String,
    /// Translated "updating" marker while an edit is unanswered.
    pub updating: Option<String>,
    /// Decrement is disabled at quantity one; removal is a separate control.
    pub can_decrement: bool,
    pub can_increment: bool,
    pub error: Option<String>,
}

/// Filter panel contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPanel {
    pub title: String,
    pub active_count: usize,
    /// Translated active-count badge, present when anything is selected.
    pub active_label: Option<String>,
    pub selections: Vec<String>,
    pub price_label: String,
    pub price_min: u32,
    pub price_max: u32,
    pub online_only: bool,
    pub expanded: Vec<FilterSection>,
}
