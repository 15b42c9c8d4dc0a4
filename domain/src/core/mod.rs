//! Core domain concepts shared across all subdomains.
//!
//! - [`error::ValidationError`]: malformed caller input
//! - [`string`]: UTF-8 safe truncation helpers

pub mod error;
pub mod string;
