//! Notification routing
//!
//! One branch: a classification carrying the pollution tag alerts the
//! prefecture channel, anything else sends the resolved message to the
//! citizen channel. When simulation is enabled the prefecture alert is
//! replaced by its clearly marked drill variant.

use tracing::{info, warn};

use super::telegram::{NotifyError, TelegramNotifier};
use super::templates;
use crate::metrics::METRICS;
use crate::storage::StoredImage;
use crate::vision::Analysis;

/// Tag value that gates the prefecture alert
pub const POLLUTION_TAG: &str = "pollution";

/// Recipient channel for a dispatched notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    Prefecture,
    Citizen,
}

impl Audience {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prefecture => "prefecture",
            Self::Citizen => "citizen",
        }
    }
}

/// A completed dispatch
#[derive(Debug, Clone, Copy)]
pub struct Dispatch {
    pub audience: Audience,
    pub simulated: bool,
}

/// Chooses and sends the notification for a classification result
pub struct NotificationRouter {
    notifier: TelegramNotifier,
    simulate: bool,
}

impl NotificationRouter {
    pub fn new(notifier: TelegramNotifier, simulate: bool) -> Self {
        Self { notifier, simulate }
    }

    /// Which channel a classification result is routed to
    pub fn route(analysis: &Analysis) -> Audience {
        if analysis.has_tag(POLLUTION_TAG) {
            Audience::Prefecture
        } else {
            Audience::Citizen
        }
    }

    /// The caption template for an audience under the current mode
    pub fn caption(&self, audience: Audience) -> &'static str {
        match audience {
            Audience::Prefecture if self.simulate => templates::SIMULATED_ALERT,
            Audience::Prefecture => templates::PREFECTURE_ALERT,
            Audience::Citizen => templates::CITIZEN_RESOLVED,
        }
    }

    /// Render the template for `analysis` and send it with the image.
    ///
    /// Failures are reported to the caller rather than swallowed; the
    /// audience is logged here, where it is known.
    pub async fn dispatch(
        &self,
        analysis: &Analysis,
        image: &StoredImage,
    ) -> Result<Dispatch, NotifyError> {
        let audience = Self::route(analysis);
        let simulated = self.simulate && audience == Audience::Prefecture;
        let caption = self.caption(audience);

        match self.notifier.send_photo(caption, &image.path).await {
            Ok(()) => {
                METRICS.record_notify(audience.as_str(), true);
                info!(audience = audience.as_str(), simulated, "notification sent");
                Ok(Dispatch {
                    audience,
                    simulated,
                })
            }
            Err(err) => {
                METRICS.record_notify(audience.as_str(), false);
                warn!(
                    audience = audience.as_str(),
                    error = %err,
                    "notification dispatch failed"
                );
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TelegramConfig;
    use serde_json::json;

    fn test_router(simulate: bool) -> NotificationRouter {
        let config = TelegramConfig {
            bot_token: Some("TEST_TOKEN".to_string()),
            chat_id: Some("4242".to_string()),
            ..TelegramConfig::default()
        };
        NotificationRouter::new(TelegramNotifier::new(config).unwrap(), simulate)
    }

    #[test]
    fn test_pollution_tag_routes_to_prefecture() {
        let analysis = Analysis::from_value(json!({"tags": ["pollution", "river"]}));
        assert_eq!(NotificationRouter::route(&analysis), Audience::Prefecture);
    }

    #[test]
    fn test_other_tags_route_to_citizen() {
        let analysis = Analysis::from_value(json!({"tags": ["tree", "water"]}));
        assert_eq!(NotificationRouter::route(&analysis), Audience::Citizen);
    }

    #[test]
    fn test_empty_tags_route_to_citizen() {
        let analysis = Analysis::from_value(json!({}));
        assert_eq!(NotificationRouter::route(&analysis), Audience::Citizen);
    }

    #[test]
    fn test_caption_selection() {
        let router = test_router(false);
        assert_eq!(
            router.caption(Audience::Prefecture),
            templates::PREFECTURE_ALERT
        );
        assert_eq!(router.caption(Audience::Citizen), templates::CITIZEN_RESOLVED);
    }

    #[test]
    fn test_simulation_swaps_prefecture_caption_only() {
        let router = test_router(true);
        assert_eq!(
            router.caption(Audience::Prefecture),
            templates::SIMULATED_ALERT
        );
        assert_eq!(router.caption(Audience::Citizen), templates::CITIZEN_RESOLVED);
    }
}
