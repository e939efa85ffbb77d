//! UI state held by the store.
//!
//! [`UiState`] is plain data. It is only ever replaced wholesale by
//! [`reduce`](super::reduce), never mutated in place by callers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Lowest selectable price in the filter panel, in major units.
pub const PRICE_FLOOR: u32 = 0;
/// Highest selectable price in the filter panel, in major units.
pub const PRICE_CEILING: u32 = 50_000;
/// Minimum distance kept between the two price handles.
pub const PRICE_MIN_GAP: u32 = 1_000;

/// Mutually exclusive overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Overlay {
    Menu,
    Search,
    Login,
    Filter,
    Cart,
}

impl Overlay {
    pub const ALL: [Self; 5] = [Self::Menu, Self::Search, Self::Login, Self::Filter, Self::Cart];
}

/// Multi-select facets in the filter panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    Category,
    Collection,
    Color,
    Size,
}

/// Collapsible sections of the filter panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterSection {
    Categories,
    Collections,
    Colors,
    Sizes,
    Price,
    Availability,
}

/// Inclusive price window, in major units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: u32,
    pub max: u32,
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            min: PRICE_FLOOR,
            max: PRICE_CEILING,
        }
    }
}

impl PriceRange {
    /// Moves the lower handle, keeping it at least [`PRICE_MIN_GAP`] below the upper.
    #[must_use]
    pub fn with_min(self, min: u32) -> Self {
        let ceiling = self.max.saturating_sub(PRICE_MIN_GAP);
        Self {
            min: min.clamp(PRICE_FLOOR, PRICE_CEILING).min(ceiling),
            max: self.max,
        }
    }

    /// Moves the upper handle, keeping it at least [`PRICE_MIN_GAP`] above the lower.
    #[must_use]
    pub fn with_max(self, max: u32) -> Self {
        let floor = self.min.saturating_add(PRICE_MIN_GAP);
        Self {
            min: self.min,
            max: max.clamp(PRICE_FLOOR, PRICE_CEILING).max(floor),
        }
    }

    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Filter panel selections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub categories: BTreeSet<String>,
    pub collections: BTreeSet<String>,
    pub colors: BTreeSet<String>,
    pub sizes: BTreeSet<String>,
    pub price_range: PriceRange,
    pub online_only: bool,
}

impl FilterCriteria {
    /// Number of active selections: every facet value plus online-only.
    ///
    /// The price window does not count.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.categories.len()
            + self.collections.len()
            + self.colors.len()
            + self.sizes.len()
            + usize::from(self.online_only)
    }

    pub(crate) fn facet_mut(&mut self, facet: Facet) -> &mut BTreeSet<String> {
        match facet {
            Facet::Category => &mut self.categories,
            Facet::Collection => &mut self.collections,
            Facet::Color => &mut self.colors,
            Facet::Size => &mut self.sizes,
        }
    }
}

/// Promo banner rotator state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoState {
    pub visible: bool,
    pub paused: bool,
    pub index: usize,
    /// Number of configured messages. Fixed for the life of the store.
    pub message_count: usize,
}

/// Everything the storefront chrome renders from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    pub menu_open: bool,
    pub search_open: bool,
    pub login_open: bool,
    pub filter_open: bool,
    pub cart_open: bool,

    /// Depth into the navigation menu. Zero whenever the menu is closed.
    pub menu_level: usize,
    /// Categories drilled into, outermost first. `menu_path.len() == menu_level`.
    pub menu_path: Vec<String>,

    pub promo: PromoState,

    pub wishlist: BTreeSet<String>,
    pub filters: FilterCriteria,
    pub expanded_sections: BTreeSet<FilterSection>,
    pub reduced_motion: bool,
}

impl UiState {
    /// Initial state for a storefront with `promo_messages` banner messages.
    #[must_use]
    pub fn new(promo_messages: usize) -> Self {
        Self {
            menu_open: false,
            search_open: false,
            login_open: false,
            filter_open: false,
            cart_open: false,
            menu_level: 0,
            menu_path: Vec::new(),
            promo: PromoState {
                visible: promo_messages > 0,
                paused: false,
                index: 0,
                message_count: promo_messages,
            },
            wishlist: BTreeSet::new(),
            filters: FilterCriteria::default(),
            expanded_sections: [FilterSection::Categories, FilterSection::Price]
                .into_iter()
                .collect(),
            reduced_motion: false,
        }
    }

    #[must_use]
    pub const fn is_open(&self, overlay: Overlay) -> bool {
        match overlay {
            Overlay::Menu => self.menu_open,
            Overlay::Search => self.search_open,
            Overlay::Login => self.login_open,
            Overlay::Filter => self.filter_open,
            Overlay::Cart => self.cart_open,
        }
    }

    #[must_use]
    pub fn any_overlay_open(&self) -> bool {
        Overlay::ALL.iter().any(|o| self.is_open(*o))
    }

    /// The open overlay, if any. Mutual exclusion means there is at most one.
    #[must_use]
    pub fn open_overlay(&self) -> Option<Overlay> {
        Overlay::ALL.into_iter().find(|o| self.is_open(*o))
    }

    pub(crate) fn set_open(&mut self, overlay: Overlay, open: bool) {
        match overlay {
            Overlay::Menu => self.menu_open = open,
            Overlay::Search => self.search_open = open,
            Overlay::Login => self.login_open = open,
            Overlay::Filter => self.filter_open = open,
            Overlay::Cart => self.cart_open = open,
        }
    }

    #[must_use]
    pub fn is_wishlisted(&self, product_id: &str) -> bool {
        self.wishlist.contains(product_id)
    }
}
