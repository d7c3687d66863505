//! Caption templates
//!
//! Static texts attached to the outgoing photo. Which one is sent is
//! decided by the notification router; the simulated variant is only
//! reachable when simulation is enabled in configuration.

/// Alert sent to the municipal inspection channel when a pollution tag is
/// detected.
pub const PREFECTURE_ALERT: &str = "\
Pollution alert:
An image captured by the monitoring cameras was analyzed and contains indicators of pollution in the area.

Location: Capibaribe River (approximate reference point)

Analysis details:
- The image was classified with the tag: pollution.
- The identified area may be suffering from inadequate sanitation conditions and requires inspection.

Recommended action:
The municipal inspection team should survey the indicated area to ensure a healthy environment.

The image captured by the monitoring cameras is attached for verification.";

/// Message sent to the resident channel when no pollution tag is present.
pub const CITIZEN_RESOLVED: &str = "\
Hello! This is your city hall.

The area where you live has been cleaned. Through the monitoring cameras we detected the need for action, and the situation has now been resolved.

Your right to basic sanitation is fundamental, and the city is monitoring continuously to keep your region clean and safe.

Thank you for your patience and cooperation.

The analyzed image is attached; the area is now free of pollution.";

/// Drill variant of the prefecture alert, clearly marked as simulated.
pub const SIMULATED_ALERT: &str = "\
[SIMULATED] Pollution alert:
An image captured by the monitoring cameras was analyzed and contains indicators of pollution in the area.

Location: Capibaribe River (approximate reference point)

Analysis details:
- The image was classified with the tag: pollution.
- The identified area may be suffering from inadequate sanitation conditions and requires inspection.

Recommended action:
The municipal inspection team should survey the indicated area to ensure a healthy environment.

The image captured by the monitoring cameras is attached for verification.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_are_distinct() {
        assert_ne!(PREFECTURE_ALERT, CITIZEN_RESOLVED);
        assert_ne!(PREFECTURE_ALERT, SIMULATED_ALERT);
        assert_ne!(CITIZEN_RESOLVED, SIMULATED_ALERT);
    }

    #[test]
    fn test_simulated_variant_is_marked() {
        assert!(SIMULATED_ALERT.starts_with("[SIMULATED]"));
        assert!(!PREFECTURE_ALERT.contains("[SIMULATED]"));
        assert!(!CITIZEN_RESOLVED.contains("[SIMULATED]"));
    }
}
