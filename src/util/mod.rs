//! Utility functions shared across the crate.
//!
//! This module provides common utilities for:
//! - Plot palette colors
//! - Label and size formatting

pub mod color;
pub mod format;

pub use color::Rgb;
pub use format::format_bytes;
