//! Application state.
//!
//! Shared state for all request handlers.

use mdr_export::Exporter;

/// Application state shared across all handlers.
///
/// Immutable after startup. Each request renders with its own engine.
pub(crate) struct AppState {
    /// Renderer wired from configuration.
    pub(crate) exporter: Exporter,
}
