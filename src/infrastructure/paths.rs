//! Data directory resolution.
//!
//! The data directory comes from configuration when set, otherwise from the
//! platform data directory (`~/.local/share/storefront-core` on Linux).

use std::path::{Path, PathBuf};

const APP_DIR: &str = "storefront-core";

/// Returns the data directory for preferences and traces.
///
/// `configured` takes precedence and has `~` expanded. Falls back to the
/// platform data directory, then to `./.storefront-core` when the platform
/// offers none.
#[must_use]
pub fn get_data_dir(configured: Option<&Path>) -> PathBuf {
    if let Some(path) = configured {
        return path
            .to_str()
            .map_or_else(|| path.to_path_buf(), |s| PathBuf::from(expand_tilde(s)));
    }

    dirs::data_dir().map_or_else(|| PathBuf::from(".").join(format!(".{APP_DIR}")), |dir| dir.join(APP_DIR))
}

/// Location of the persisted preferences file.
#[must_use]
pub fn preferences_file(data_dir: &Path) -> PathBuf {
    data_dir.join("preferences.json")
}

/// Location of the span export file.
#[must_use]
pub fn trace_file(data_dir: &Path) -> PathBuf {
    data_dir.join("storefront-otlp.json")
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading tilde, or with no known home directory, are
/// returned unchanged.
///
/// ```
/// use storefront_core::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("/absolute/path"), "/absolute/path");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    let Some(home) = dirs::home_dir() else {
        return path.to_string();
    };

    if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest).to_string_lossy().into_owned()
    } else if path == "~" {
        home.to_string_lossy().into_owned()
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_dir_wins() {
        let dir = get_data_dir(Some(Path::new("/srv/storefront")));
        assert_eq!(dir, PathBuf::from("/srv/storefront"));
        assert_eq!(preferences_file(&dir), PathBuf::from("/srv/storefront/preferences.json"));
    }

    #[test]
    fn default_dir_ends_with_app_name() {
        assert!(get_data_dir(None).ends_with("storefront-core") || get_data_dir(None).ends_with(".storefront-core"));
    }

    #[test]
    fn tilde_expansion() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(PathBuf::from(expand_tilde("~/shop")), home.join("shop"));
        }
        assert_eq!(expand_tilde("relative/path"), "relative/path");
    }
}
