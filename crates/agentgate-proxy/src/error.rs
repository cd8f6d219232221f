//! Mapping of bridge failures onto HTTP responses.

use agentgate_core::BridgeError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::models::ErrorResponse;

/// nginx's "client closed request". Never actually reaches the client.
const CLIENT_CLOSED_REQUEST: u16 = 499;

/// HTTP status for a failed request.
pub fn status_for(err: &BridgeError) -> StatusCode {
    match err {
        BridgeError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        BridgeError::Spawn { .. } | BridgeError::AgentExit { .. } | BridgeError::Io(_) => {
            StatusCode::BAD_GATEWAY
        }
        BridgeError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        BridgeError::Cancelled => {
            StatusCode::from_u16(CLIENT_CLOSED_REQUEST).unwrap_or(StatusCode::BAD_REQUEST)
        }
    }
}

/// Convert a bridge error into an OpenAI-style JSON error response.
pub fn error_response(err: &BridgeError) -> Response {
    (status_for(err), Json(ErrorResponse::from(err))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&BridgeError::invalid_request("x")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&BridgeError::AgentExit {
                exit_code: Some(1),
                stderr: String::new(),
            }),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&BridgeError::Timeout(Duration::from_secs(1))),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(status_for(&BridgeError::Cancelled).as_u16(), 499);
    }

    #[test]
    fn test_error_response_status() {
        let response = error_response(&BridgeError::Io(std::io::Error::other("pipe")));
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
