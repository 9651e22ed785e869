//! Static asset constants (CSS and JavaScript).

/// Stylesheet for the dashboard.
pub const CSS: &str = include_str!("styles.css");

/// JavaScript for job polling and form submission.
pub const JS: &str = include_str!("dashboard.js");
