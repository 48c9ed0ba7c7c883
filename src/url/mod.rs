//! URL handling module for Spidey
//!
//! This module provides the URL-syntax validator shared by the submission
//! path and the discovered-link filter.

mod validate;

pub use validate::is_valid_http_url;
