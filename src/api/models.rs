//! Shared API response models

use serde::{Deserialize, Serialize};

/// Error payload returned by the analyze API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Fixed user-facing error messages
pub mod messages {
    /// Returned for every classifier failure, regardless of cause
    pub const ANALYSIS_FAILED: &str = "An error occurred during analysis.";
    pub const MISSING_FILE_FIELD: &str = "Missing multipart field 'file'.";
    pub const MALFORMED_MULTIPART: &str = "Malformed multipart request body.";
    pub const UPLOAD_FAILED: &str = "Failed to store uploaded image.";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_shape() {
        let body = ErrorBody::new(messages::ANALYSIS_FAILED);
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"error":"An error occurred during analysis."}"#
        );
    }
}
