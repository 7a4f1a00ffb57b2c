// filepath: src/widget/mod.rs
//! Widget system for oled-status
//!
//! This is the main entry point for the widget system.
//! It re-exports the core trait and the registry that composes widgets.

pub mod interface;
mod registry;

pub use interface::Widget;
pub use registry::WidgetRegistry;
