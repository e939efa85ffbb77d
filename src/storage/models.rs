//! Storage record models.
//!
//! Kept separate from [`Preferences`] so the on-disk format can carry
//! bookkeeping fields the domain does not care about.

use crate::domain::Preferences;
use serde::{Deserialize, Serialize};

/// Preferences as written to disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferencesRecord {
    /// Wishlisted product ids.
    #[serde(default)]
    pub wishlist: Vec<String>,

    /// Whether the shopper dismissed the promo banner.
    #[serde(default)]
    pub promo_banner_closed: bool,

    /// Whether rotation and other motion should stay off.
    #[serde(default)]
    pub reduced_motion: bool,

    /// Unix timestamp of the last save, `None` if never saved.
    #[serde(default)]
    pub updated_at: Option<i64>,
}

impl PreferencesRecord {
    /// Builds a record stamped with the current time.
    #[must_use]
    pub fn from_preferences(preferences: &Preferences) -> Self {
        Self {
            wishlist: preferences.wishlist.clone(),
            promo_banner_closed: preferences.promo_banner_closed,
            reduced_motion: preferences.reduced_motion,
            updated_at: Some(chrono::Utc::now().timestamp()),
        }
    }

    /// Converts to the domain type. The wishlist comes back sorted and deduplicated.
    #[must_use]
    pub fn into_preferences(self) -> Preferences {
        let mut wishlist = self.wishlist;
        wishlist.sort();
        wishlist.dedup();

        Preferences {
            wishlist,
            promo_banner_closed: self.promo_banner_closed,
            reduced_motion: self.reduced_motion,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_normalizes_wishlist() {
        let record = PreferencesRecord {
            wishlist: vec!["b".into(), "a".into(), "b".into()],
            reduced_motion: true,
            ..PreferencesRecord::default()
        };
        let prefs = record.into_preferences();
        assert_eq!(prefs.wishlist, vec!["a".to_string(), "b".to_string()]);
        assert!(prefs.reduced_motion);
    }

    #[test]
    fn record_is_stamped() {
        let record = PreferencesRecord::from_preferences(&Preferences::default());
        assert!(record.updated_at.is_some());
    }
}
