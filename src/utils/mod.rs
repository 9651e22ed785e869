//! Shared utility functions.
//!
//! This module contains reusable utilities used across the codebase:
//! - `html`: HTML escaping for safe rendering
//! - `format`: Human-readable formatting (sizes, durations, timestamps)

mod format;
mod html;

pub use format::{format_duration, format_size, format_timestamp};
pub use html::html_escape;
