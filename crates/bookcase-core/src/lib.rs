//! Core types for the bookcase configurator.
//!
//! This crate provides the foundational types used across all other bookcase crates:
//! - The [`Configuration`] record describing a bookcase and its drawers
//! - Partial updates coming from form controls ([`ConfigPatch`])
//! - Color values and color string parsing
//! - Error types

pub mod color;
pub mod config;
pub mod errors;
pub mod types;

pub use color::parse_color;
pub use config::*;
pub use errors::*;
pub use types::*;
