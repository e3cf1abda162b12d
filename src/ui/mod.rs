//! Console output for the cc-server CLI
//!
//! All styling decisions flow through [`context::UiContext`]; colors and
//! icons are sourced from [`theme`] so the event stream renders the same
//! everywhere, with ASCII fallbacks for terminals without unicode.

pub mod context;
pub mod theme;
pub mod views;
