//! View layer.
//!
//! ```text
//! AppState → compute_viewmodel → UIViewModel → render → text
//! ```
//!
//! A host UI consumes [`UIViewModel`] directly. [`render`] turns it into
//! plain text for the replay tool and for snapshot-style tests.
//!
//! # Modules
//!
//! - [`viewmodel`]: display-ready view model types
//! - [`renderer`]: top-level text renderer
//! - [`components`]: per-section renderers
//! - [`helpers`]: match highlighting and amount formatting

pub mod components;
pub mod helpers;
pub mod renderer;
pub mod viewmodel;

pub use renderer::render;
pub use viewmodel::{
    CartDrawer, CartLineView, FilterPanel, HeaderInfo, MenuView, PromoView, ResultItem, ResultSection,
    SearchBody, SearchPanel, UIViewModel,
};
