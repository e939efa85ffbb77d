//! Reducer-style UI state store.
//!
//! One [`UiStore`] per storefront. Its state is private; the only way to
//! change it is [`UiStore::dispatch`] with a [`UiAction`], which runs the pure
//! [`reduce`] function and reports whether anything changed.

pub mod actions;
pub mod reducer;
pub mod state;

pub use actions::UiAction;
pub use reducer::reduce;
pub use state::{
    Facet, FilterCriteria, FilterSection, Overlay, PriceRange, PromoState, UiState, PRICE_CEILING, PRICE_FLOOR,
    PRICE_MIN_GAP,
};

/// Owner of the single [`UiState`].
#[derive(Debug, Clone)]
pub struct UiStore {
    state: UiState,
}

impl UiStore {
    #[must_use]
    pub const fn new(initial: UiState) -> Self {
        Self { state: initial }
    }

    /// Applies `action`. Returns `true` if the state changed.
    pub fn dispatch(&mut self, action: &UiAction) -> bool {
        let _span = tracing::debug_span!("ui_dispatch", action = ?action).entered();

        let next = reduce(&self.state, action);
        if next == self.state {
            tracing::trace!("state unchanged");
            return false;
        }

        self.state = next;
        true
    }

    #[must_use]
    pub const fn state(&self) -> &UiState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_reports_change() {
        let mut store = UiStore::new(UiState::new(4));
        assert!(store.dispatch(&UiAction::Open(Overlay::Search)));
        assert!(!store.dispatch(&UiAction::Open(Overlay::Search)));
        assert!(store.dispatch(&UiAction::Close(Overlay::Search)));
        assert!(!store.dispatch(&UiAction::Close(Overlay::Search)));
    }
}
