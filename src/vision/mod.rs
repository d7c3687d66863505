//! Vision classification upstream
//!
//! A single POST of raw image bytes to the configured analyze endpoint.
//! The returned JSON is kept verbatim for the API response; routing only
//! consults the extracted tag strings.

pub mod client;
pub mod models;

pub use client::{VisionClient, VisionError};
pub use models::Analysis;
