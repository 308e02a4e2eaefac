use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use validator::ValidationErrors;

use crate::error::AdminError;

/// The admin wire response: `{Status, Message?, Messages?}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DispatchResponse {
    pub status: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<String>>,
}

impl DispatchResponse {
    #[must_use]
    pub fn ok() -> Self {
        Self {
            status: true,
            message: None,
            messages: None,
        }
    }

    #[must_use]
    pub fn ok_with_message(message: impl Into<String>) -> Self {
        Self {
            status: true,
            message: Some(message.into()),
            messages: None,
        }
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: false,
            message: Some(message.into()),
            messages: None,
        }
    }

    #[must_use]
    pub fn failures(errors: &ValidationErrors) -> Self {
        let messages: Vec<String> = errors
            .field_errors()
            .iter()
            .map(|(field, errors)| format!("{field}: {} invalid", errors.len()))
            .collect();
        Self {
            status: false,
            message: Some("Invalid request parameters".to_string()),
            messages: Some(messages),
        }
    }
}

impl From<&AdminError> for DispatchResponse {
    fn from(error: &AdminError) -> Self {
        Self::failure(error.to_string())
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        match self {
            // an unreachable store is an operational fault, not a bad request
            Self::Store(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
            }
            _ => Json(DispatchResponse::from(&self)).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_omits_message_fields() {
        let body = serde_json::to_value(DispatchResponse::ok()).unwrap();
        assert_eq!(body, serde_json::json!({"Status": true}));
    }

    #[test]
    fn test_failure_carries_the_message() {
        let body = serde_json::to_value(DispatchResponse::failure("Invalid CRON")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"Status": false, "Message": "Invalid CRON"})
        );
    }
}
