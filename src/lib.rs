//! Image pollution analysis service
//!
//! Accepts an image upload, classifies it through a remote vision
//! service, and notifies either the municipal prefecture channel or the
//! citizen channel depending on whether a pollution tag was detected.

pub mod api;
pub mod config;
pub mod metrics;
pub mod notify;
pub mod storage;
pub mod vision;
