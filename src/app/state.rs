//! Application state and view model computation.
//!
//! [`AppState`] owns the four stateful parts of the core: the UI store, the
//! search session, the optimistic cart and the promo timer. It is mutated only
//! by [`handle_event`](super::handle_event); view models are computed on
//! demand from a snapshot.

use super::Action;
use crate::cart::{CartSummary, OptimisticCart};
use crate::domain::{HitKind, Money, Preferences, SearchResult};
use crate::i18n::Locale;
use crate::search::{SearchSession, SlotView};
use crate::store::{UiAction, UiState, UiStore};
use crate::ui::helpers::{format_amount, highlight_ranges};
use crate::ui::viewmodel::{
    CartDrawer, CartLineView, FilterPanel, HeaderInfo, MenuView, PromoView, ResultItem, ResultSection,
    SearchBody, SearchPanel, UIViewModel,
};
use crate::worker::WorkerMessage;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// One promo banner message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoMessage {
    pub text: String,
    #[serde(default)]
    pub href: Option<String>,
}

/// Runtime settings resolved from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Quiet interval before a typed query fires.
    pub search_quiet: Duration,
    /// Minimum trimmed length, in characters, for a query to fire.
    pub min_query_length: usize,
    /// Hits requested per result bucket.
    pub result_limit: u32,
    /// Terms offered before anything is typed.
    pub trending: Vec<String>,
    /// Used until the first server cart supplies one.
    pub currency: String,
    pub free_shipping_threshold: Money,
    pub promo_messages: Vec<PromoMessage>,
    pub promo_rotation: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            search_quiet: Duration::from_millis(300),
            min_query_length: 2,
            result_limit: 6,
            trending: Vec::new(),
            currency: "SAR".to_string(),
            free_shipping_threshold: Money::from_major(300),
            promo_messages: Vec::new(),
            promo_rotation: Duration::from_millis(4500),
        }
    }
}

/// Central state container.
#[derive(Debug, Clone)]
pub struct AppState {
    store: UiStore,
    pub(crate) search: SearchSession,
    pub(crate) cart: OptimisticCart,
    settings: Settings,

    /// When the promo banner next rotates. `None` while rotation is stopped.
    promo_deadline: Option<Instant>,

    /// Last wake-up handed to the runtime.
    scheduled_wake: Option<Instant>,
}

impl AppState {
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            store: UiStore::new(UiState::new(settings.promo_messages.len())),
            search: SearchSession::new(settings.search_quiet, settings.min_query_length, settings.result_limit),
            cart: OptimisticCart::new(),
            settings,
            promo_deadline: None,
            scheduled_wake: None,
        }
    }

    #[must_use]
    pub fn ui(&self) -> &UiState {
        self.store.state()
    }

    #[must_use]
    pub const fn search(&self) -> &SearchSession {
        &self.search
    }

    #[must_use]
    pub const fn cart(&self) -> &OptimisticCart {
        &self.cart
    }

    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The persisted subset of UI state.
    #[must_use]
    pub fn preferences(&self) -> Preferences {
        let ui = self.ui();
        Preferences {
            wishlist: ui.wishlist.iter().cloned().collect(),
            promo_banner_closed: ui.promo.message_count > 0 && !ui.promo.visible,
            reduced_motion: ui.reduced_motion,
        }
    }

    /// Dispatches to the store and derives the side effects of the change.
    ///
    /// - closing the search overlay resets the search session;
    /// - a flip of "any overlay open" emits [`Action::SetScrollLock`];
    /// - with `persist`, a change to persisted preferences posts a save.
    pub(crate) fn dispatch(&mut self, action: &UiAction, now: Option<Instant>, persist: bool) -> (bool, Vec<Action>) {
        let was_searching = self.ui().search_open;
        let was_locked = self.ui().any_overlay_open();
        let before = self.preferences();

        if !self.store.dispatch(action) {
            return (false, vec![]);
        }

        let mut actions = vec![];

        if was_searching && !self.ui().search_open {
            tracing::debug!("search overlay closed, resetting session");
            self.search.reset();
        }

        let locked = self.ui().any_overlay_open();
        if locked != was_locked {
            actions.push(Action::SetScrollLock(locked));
        }

        if persist {
            let after = self.preferences();
            if after != before {
                actions.push(Action::PostToWorker(WorkerMessage::save_preferences(after)));
            }
        }

        self.sync_promo_timer(now, matches!(action, UiAction::ShowPromo(_)));

        (true, actions)
    }

    fn promo_rotating(&self) -> bool {
        let ui = self.ui();
        ui.promo.visible && !ui.promo.paused && ui.promo.message_count > 1 && !ui.reduced_motion
    }

    /// Stops the promo timer when rotation is off, arms it when rotation is on
    /// and `now` is known. `restart` re-arms a running timer from `now`.
    pub(crate) fn sync_promo_timer(&mut self, now: Option<Instant>, restart: bool) {
        if !self.promo_rotating() {
            self.promo_deadline = None;
            return;
        }

        if let Some(now) = now {
            if restart || self.promo_deadline.is_none() {
                self.promo_deadline = Some(now + self.settings.promo_rotation);
            }
        }
    }

    /// Advances the promo banner if its deadline has passed.
    pub(crate) fn rotate_promo_if_due(&mut self, now: Instant) -> bool {
        if !self.promo_deadline.is_some_and(|deadline| now >= deadline) {
            return false;
        }

        let changed = self.store.dispatch(&UiAction::AdvancePromo);
        self.promo_deadline = Some(now + self.settings.promo_rotation);
        changed
    }

    /// Earliest instant at which a [`Tick`](super::Event::Tick) has work to do.
    #[must_use]
    pub fn next_wake(&self) -> Option<Instant> {
        match (self.search.next_deadline(), self.promo_deadline) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// A [`Action::ScheduleWake`] if the earliest deadline moved.
    pub(crate) fn wake_action(&mut self) -> Option<Action> {
        let wake = self.next_wake();
        if wake == self.scheduled_wake {
            return None;
        }

        self.scheduled_wake = wake;
        wake.map(|at| Action::ScheduleWake { at })
    }

    fn display_currency(&self) -> &str {
        if self.cart.currency_code().is_empty() {
            &self.settings.currency
        } else {
            self.cart.currency_code()
        }
    }

    /// Computes the full view model.
    #[must_use]
    pub fn compute_viewmodel(&self, locale: &dyn Locale) -> UIViewModel {
        let ui = self.ui();

        UIViewModel {
            rtl: locale.is_rtl(),
            reduced_motion: ui.reduced_motion,
            scroll_locked: ui.any_overlay_open(),
            header: self.compute_header(locale),
            promo: self.compute_promo(locale),
            open_overlay: ui.open_overlay(),
            menu: ui.menu_open.then(|| self.compute_menu(locale)),
            search: ui.search_open.then(|| self.compute_search(locale)),
            cart: ui.cart_open.then(|| self.compute_cart(locale)),
            filters: ui.filter_open.then(|| self.compute_filters(locale)),
            login: ui.login_open.then(|| locale.t("login.title")),
        }
    }

    fn compute_header(&self, locale: &dyn Locale) -> HeaderInfo {
        let wishlist_count = self.ui().wishlist.len();
        HeaderInfo {
            wishlist_label: locale.t_with("wishlist.count", &[("count", &wishlist_count.to_string())]),
            wishlist_count,
            cart_count: self.cart.display_lines().iter().map(|l| l.line.quantity).sum(),
        }
    }

    fn compute_promo(&self, locale: &dyn Locale) -> Option<PromoView> {
        let promo = &self.ui().promo;
        if !promo.visible {
            return None;
        }

        let message = self.settings.promo_messages.get(promo.index)?;
        Some(PromoView {
            text: message.text.clone(),
            href: message.href.clone(),
            index: promo.index,
            count: promo.message_count,
            paused_label: promo.paused.then(|| locale.t("promo.paused")),
        })
    }

    fn compute_menu(&self, locale: &dyn Locale) -> MenuView {
        let ui = self.ui();
        MenuView {
            title: locale.t("menu.title"),
            path: ui.menu_path.clone(),
            back_label: (ui.menu_level > 0).then(|| locale.t("menu.back")),
        }
    }

    fn compute_search(&self, locale: &dyn Locale) -> SearchPanel {
        let term = self.search.term();

        let body = match self.search.view() {
            SlotView::Idle => SearchBody::Prompt {
                message: locale.t("search.prompt"),
                trending_title: locale.t("search.trending"),
                trending: self.settings.trending.clone(),
            },
            SlotView::Searching { previous, .. } => SearchBody::Searching {
                message: locale.t("search.searching"),
                previous: previous.map(|r| self.compute_sections(r, term, locale)).unwrap_or_default(),
            },
            SlotView::NoResults { query } => SearchBody::NoResults {
                message: locale.t_with("search.no_results", &[("term", &query.term)]),
            },
            SlotView::Failed { message, previous } => {
                tracing::trace!(error = %message, "rendering search failure");
                SearchBody::Failed {
                    message: locale.t("search.retry"),
                    previous: previous.map(|r| self.compute_sections(r, term, locale)).unwrap_or_default(),
                }
            }
            SlotView::Results { query, result } => SearchBody::Results {
                total_label: locale.t_with("search.total", &[("count", &result.total_results.to_string())]),
                sections: self.compute_sections(result, &query.term, locale),
                suggestions_title: locale.t("search.suggestions"),
                suggestions: result.queries.iter().map(|q| q.text.clone()).collect(),
            },
        };

        SearchPanel {
            term: term.to_string(),
            placeholder: locale.t("search.placeholder"),
            body,
        }
    }

    fn compute_sections(&self, result: &SearchResult, term: &str, locale: &dyn Locale) -> Vec<ResultSection> {
        let currency = self.display_currency();

        result
            .buckets()
            .filter(|(_, hits)| !hits.is_empty())
            .map(|(kind, hits)| ResultSection {
                kind,
                title: locale.t(section_key(kind)),
                items: hits
                    .iter()
                    .map(|hit| ResultItem {
                        title: hit.title.clone(),
                        handle: hit.handle.clone(),
                        path: kind.path(&hit.handle),
                        price: hit.price.map(|p| format_amount(p, currency)),
                        wishlisted: self.ui().is_wishlisted(&hit.id),
                        highlight_ranges: highlight_ranges(&hit.title, term),
                    })
                    .collect(),
            })
            .collect()
    }

    fn compute_cart(&self, locale: &dyn Locale) -> CartDrawer {
        let summary = CartSummary::of(&self.cart, self.settings.free_shipping_threshold, &self.settings.currency);
        let currency = summary.currency_code.as_str();

        let lines: Vec<CartLineView> = self
            .cart
            .display_lines()
            .into_iter()
            .map(|display| {
                let line = display.line;
                CartLineView {
                    title: line.title.clone(),
                    quantity: line.quantity,
                    line_total: format_amount(line.line_total(), currency),
                    updating: display.pending_since.map(|_| locale.t("cart.updating")),
                    can_decrement: line.quantity > 1,
                    can_increment: line.quantity_available.map_or(true, |available| line.quantity < available),
                    error: display.error,
                    id: line.id,
                }
            })
            .collect();

        let free_shipping = summary.free_shipping;
        let free_shipping_message = if free_shipping.qualified {
            locale.t("cart.free_shipping_unlocked")
        } else {
            locale.t_with(
                "cart.free_shipping_remaining",
                &[("amount", &free_shipping.remaining.to_string()), ("currency", currency)],
            )
        };

        CartDrawer {
            title: locale.t("cart.title"),
            empty_message: lines.is_empty().then(|| locale.t("cart.empty")),
            lines,
            subtotal_label: locale.t("cart.subtotal"),
            subtotal: format_amount(summary.subtotal, currency),
            discounts: summary.applied_discounts,
            free_shipping_message,
            free_shipping_percent: free_shipping.percent,
            errors: self.cart.orphan_errors().to_vec(),
            checkout_label: locale.t("cart.checkout"),
            checkout_url: (summary.line_count > 0)
                .then(|| self.cart.checkout_url().map(str::to_string))
                .flatten(),
        }
    }

    fn compute_filters(&self, locale: &dyn Locale) -> FilterPanel {
        let filters = &self.ui().filters;
        let active_count = filters.active_count();

        let selections = [
            ("category", &filters.categories),
            ("collection", &filters.collections),
            ("color", &filters.colors),
            ("size", &filters.sizes),
        ]
        .into_iter()
        .flat_map(|(facet, values)| values.iter().map(move |v| format!("{facet}: {v}")))
        .collect();

        FilterPanel {
            title: locale.t("filters.title"),
            active_count,
            active_label: (active_count > 0)
                .then(|| locale.t_with("filters.active", &[("count", &active_count.to_string())])),
            selections,
            price_label: locale.t("filters.price"),
            price_min: filters.price_range.min,
            price_max: filters.price_range.max,
            online_only: filters.online_only,
            expanded: self.ui().expanded_sections.iter().copied().collect(),
        }
    }
}

const fn section_key(kind: HitKind) -> &'static str {
    match kind {
        HitKind::Product => "search.products",
        HitKind::Collection => "search.collections",
        HitKind::Article => "search.articles",
        HitKind::Page => "search.pages",
    }
}
