/*
 * tree_browser: the data layer of a desktop file browser. The native
 * backend owns directory scanning and asset generation; this crate mirrors
 * those entities as observable in-memory state for the UI to subscribe to.
 * See the `core` module for the full surface.
 */
pub mod core;

pub use crate::core::AppContext;
