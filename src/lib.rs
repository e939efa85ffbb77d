//! Storefront-core: the headless interaction core of a storefront front end.
//!
//! The crate owns the state behind a storefront's chrome and keeps it
//! consistent under fast, overlapping input:
//! - Debounced predictive search with a stale-response guard
//! - A single UI store for overlays, menu, promo banner, wishlist and filters
//! - Optimistic cart quantity edits reconciled against server responses
//! - Wishlist and display preferences persisted as JSON

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Runtime (page glue, storefront-replay)             │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │ Event / Action
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← Coordinator
//! │  - Event handling                                   │
//! │  - Wake-up scheduling                               │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ search/       │   │ store/        │   │ cart/         │
//! │ - Debouncer   │   │ - UiState     │   │ - Optimistic  │
//! │ - ResultSlot  │   │ - reduce      │   │   overlay     │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                        │ WorkerMessage / WorkerResponse
//! ┌─────────────────────────────────────────────────────┐
//! │  Worker (worker/)  → client/ (commerce API)         │
//! │                    → storage/ (preferences.json)    │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: coordinator with the event/action model
//! - [`search`]: debouncer, result slot and request tokens
//! - [`store`]: UI state, actions and the pure reducer
//! - [`cart`]: optimistic cart overlay and summary
//! - [`domain`]: money, search and cart models, errors
//! - [`client`]: commerce API seam and the in-memory catalog
//! - [`worker`]: message protocol and the async worker
//! - [`storage`]: preference persistence
//! - [`i18n`]: locale lookup with RTL support
//! - [`ui`]: view model types and the text renderer
//! - `observability`: OpenTelemetry tracing to a local file
//!
//! # Configuration
//!
//! ```toml
//! trace_level = "debug"
//! language = "ar"
//!
//! [search]
//! debounce_ms = 300
//! min_query_length = 2
//! result_limit = 6
//! trending = ["abaya", "pearl earrings"]
//!
//! [cart]
//! currency = "SAR"
//! free_shipping_threshold = "300.00"
//!
//! [promo]
//! rotation_ms = 4500
//! messages = [{ text = "Free shipping over 300 SAR", href = "/pages/shipping" }]
//!
//! [translations.ar]
//! "cart.title" = "حقيبتك"
//! ```
//!
//! # Example
//!
//! ```rust
//! use storefront_core::{handle_event, initialize, Action, Config, Event};
//! use std::time::Instant;
//!
//! let config = Config::from_toml_str("[search]\ndebounce_ms = 250")?;
//! let mut state = initialize(&config);
//!
//! let (_, actions) = handle_event(&mut state, &Event::Started { now: Instant::now() })?;
//! for action in actions {
//!     if let Action::PostToWorker(message) = action {
//!         // hand the message to the worker, feed its response back as
//!         // Event::WorkerResponse
//!         let _ = message;
//!     }
//! }
//! # Ok::<(), storefront_core::StorefrontError>(())
//! ```

pub mod app;
pub mod cart;
pub mod client;
pub mod domain;
pub mod i18n;
pub mod infrastructure;
pub mod replay;
pub mod search;
pub mod storage;
pub mod store;
pub mod ui;
pub mod worker;

pub mod observability;

pub use app::{handle_event, Action, AppState, Event, LineControl, PromoMessage, Settings};
pub use domain::{Money, Result, StorefrontError};
pub use i18n::{Language, Locale, TranslationTables, Translations};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// `[search]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet interval before a typed query fires. Default: 300
    pub debounce_ms: u64,
    /// Queries shorter than this (after trimming) never fire. Default: 2
    pub min_query_length: usize,
    /// Hits per result bucket. Default: 6
    pub result_limit: u32,
    /// Terms shown before anything is typed.
    pub trending: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            min_query_length: 2,
            result_limit: 6,
            trending: Vec::new(),
        }
    }
}

/// `[cart]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartConfig {
    /// Display currency until the server cart supplies one. Default: `"SAR"`
    pub currency: String,
    /// Subtotal at which shipping becomes free. Default: `"300.00"`
    pub free_shipping_threshold: Money,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            currency: "SAR".to_string(),
            free_shipping_threshold: Money::from_major(300),
        }
    }
}

/// `[promo]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromoConfig {
    /// Milliseconds each banner message stays up. Default: 4500
    pub rotation_ms: u64,
    pub messages: Vec<PromoMessage>,
}

impl Default for PromoConfig {
    fn default() -> Self {
        Self {
            rotation_ms: 4500,
            messages: Vec::new(),
        }
    }
}

/// Storefront configuration, read from TOML. Every field has a default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tracing level directive used when `RUST_LOG` is unset.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`. Default: `"info"`
    pub trace_level: Option<String>,

    /// Where preferences and trace files live. `~` is expanded.
    /// Defaults to the platform data directory.
    pub data_dir: Option<PathBuf>,

    pub language: Language,
    pub search: SearchConfig,
    pub cart: CartConfig,
    pub promo: PromoConfig,

    /// Per-language string overrides.
    pub translations: TranslationTables,
}

impl Config {
    /// Reads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML for
    /// this structure.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| StorefrontError::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from TOML text.
    ///
    /// ```rust
    /// use storefront_core::{Config, Language};
    ///
    /// let config = Config::from_toml_str("language = \"ar\"\n[search]\nmin_query_length = 3")?;
    /// assert_eq!(config.language, Language::Ar);
    /// assert_eq!(config.search.min_query_length, 3);
    /// assert_eq!(config.search.debounce_ms, 300);
    /// # Ok::<(), storefront_core::StorefrontError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Config`] on malformed TOML or mistyped values.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| StorefrontError::Config(e.to_string()))
    }

    /// Runtime settings for [`AppState`].
    #[must_use]
    pub fn settings(&self) -> Settings {
        Settings {
            search_quiet: Duration::from_millis(self.search.debounce_ms),
            min_query_length: self.search.min_query_length,
            result_limit: self.search.result_limit,
            trending: self.search.trending.clone(),
            currency: self.cart.currency.clone(),
            free_shipping_threshold: self.cart.free_shipping_threshold,
            promo_messages: self.promo.messages.clone(),
            promo_rotation: Duration::from_millis(self.promo.rotation_ms),
        }
    }

    /// Locale for the configured language and overrides.
    #[must_use]
    pub fn locale(&self) -> Translations {
        Translations::new(self.language, self.translations.clone())
    }
}

/// Creates the initial [`AppState`] from configuration.
///
/// The state starts with every overlay closed and an empty cart. Send
/// [`Event::Started`] next to restore preferences and load the cart.
#[must_use]
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!(
        language = config.language.code(),
        debounce_ms = config.search.debounce_ms,
        promo_messages = config.promo.messages.len(),
        "initializing storefront core"
    );

    AppState::new(config.settings())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.settings(), Settings::default());
    }

    #[test]
    fn full_config_parses() {
        let config = Config::from_toml_str(
            r#"
            trace_level = "debug"
            data_dir = "~/storefront"
            language = "ar"

            [search]
            debounce_ms = 250
            trending = ["abaya"]

            [cart]
            currency = "AED"
            free_shipping_threshold = "150.50"

            [promo]
            rotation_ms = 6000
            messages = [{ text = "Free returns" }, { text = "New in", href = "/collections/new" }]

            [translations.ar]
            "cart.title" = "حقيبتك"
            "#,
        )
        .unwrap();

        let settings = config.settings();
        assert_eq!(settings.search_quiet, Duration::from_millis(250));
        assert_eq!(settings.currency, "AED");
        assert_eq!(settings.free_shipping_threshold, Money::from_minor(15050));
        assert_eq!(settings.promo_messages[1].href.as_deref(), Some("/collections/new"));
        assert_eq!(settings.promo_rotation, Duration::from_millis(6000));

        let locale = config.locale();
        assert!(locale.is_rtl());
        assert_eq!(locale.t("cart.title"), "حقيبتك");
        assert_eq!(locale.t("cart.checkout"), Translations::default().t("cart.checkout"));
    }

    #[test]
    fn malformed_config_is_a_config_error() {
        assert!(matches!(
            Config::from_toml_str("[search]\ndebounce_ms = \"soon\""),
            Err(StorefrontError::Config(_))
        ));
        assert!(matches!(
            Config::from_toml_str("[cart]\nfree_shipping_threshold = \"lots\""),
            Err(StorefrontError::Config(_))
        ));
    }

    #[test]
    fn initialize_applies_promo_count() {
        let config = Config::from_toml_str("[promo]\nmessages = [{ text = \"a\" }, { text = \"b\" }]").unwrap();
        let state = initialize(&config);
        assert_eq!(state.ui().promo.message_count, 2);
        assert!(state.ui().promo.visible);
    }
}
