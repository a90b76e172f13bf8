//! Shared CLI presentation utilities.
//!
//! Format-only helpers; no session or domain logic lives here.

pub mod messages;
pub mod tables;

pub use messages::{format_message, print_message};
pub use tables::{print_separator, truncate_string};
