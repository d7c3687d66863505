//! Notification dispatch
//!
//! Renders one of the caption templates based on the classification result
//! and sends it, with the analyzed image attached, to the configured
//! recipient channel.

pub mod router;
pub mod telegram;
pub mod templates;

pub use router::{Audience, Dispatch, NotificationRouter, POLLUTION_TAG};
pub use telegram::{NotifyError, TelegramNotifier};
