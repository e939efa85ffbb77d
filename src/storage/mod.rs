//! Storage layer for persisted shopper preferences.
//!
//! # Modules
//!
//! - `backend`: Storage trait abstraction
//! - `json`: JSON file-based storage implementation
//! - `models`: Storage record types separate from domain models

pub mod backend;
pub mod json;
pub mod models;

pub use backend::Storage;
pub use json::JsonStorage;
pub use models::PreferencesRecord;
