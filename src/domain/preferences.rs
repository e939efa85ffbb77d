//! Shopper preferences that outlive a session.

use serde::{Deserialize, Serialize};

/// Preferences restored at startup and saved whenever they change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Wishlisted product ids, sorted.
    #[serde(default)]
    pub wishlist: Vec<String>,

    /// Whether the shopper dismissed the promo banner.
    #[serde(default)]
    pub promo_banner_closed: bool,

    #[serde(default)]
    pub reduced_motion: bool,
}
