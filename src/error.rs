//! Error taxonomy for the request pipeline.
//!
//! Every error is handled at the boundary where it is detected: the
//! handler maps it to an HTTP status and a short message, writes the
//! response, and returns. Nothing is retried and nothing escalates
//! past the response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::InvalidCep;

/// Status returned when the location provider does not know the CEP.
///
/// Deployed variants disagree (404 vs 422); the choice is
/// configuration, not code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotFoundPolicy {
    /// 404 Not Found.
    #[default]
    NotFound,
    /// 422 Unprocessable Entity, as the older variant answered.
    Unprocessable,
}

impl NotFoundPolicy {
    pub fn status(self) -> StatusCode {
        match self {
            NotFoundPolicy::NotFound => StatusCode::NOT_FOUND,
            NotFoundPolicy::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

/// Errors surfaced by the orchestration handlers.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Request body was not valid JSON of the expected shape.
    #[error("invalid JSON format")]
    InvalidBody,

    /// The CEP did not survive validation.
    #[error(transparent)]
    InvalidCep(#[from] InvalidCep),

    /// The location provider reports no match for the CEP.
    #[error("can not find zipcode")]
    CepNotFound {
        /// Which status this deployment answers with.
        policy: NotFoundPolicy,
    },

    /// A collaborator could not be reached, answered non-2xx, or
    /// returned a payload that cannot be used.
    #[error("upstream {target} unavailable: {reason}")]
    Upstream {
        target: &'static str,
        reason: String,
    },

    /// The next-hop service answered with an error status; the front
    /// door forwards it verbatim.
    #[error("downstream returned {status}")]
    Downstream { status: StatusCode },

    /// A collaborator answered 2xx but the body did not decode.
    #[error("failed to decode {target} response")]
    Decode { target: &'static str },
}

impl ServiceError {
    pub fn upstream(target: &'static str, reason: impl ToString) -> Self {
        Self::Upstream {
            target,
            reason: reason.to_string(),
        }
    }

    /// The HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::InvalidBody => StatusCode::BAD_REQUEST,
            ServiceError::InvalidCep(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::CepNotFound { policy } => policy.status(),
            ServiceError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            ServiceError::Downstream { status } => *status,
            ServiceError::Decode { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::warn!(status = %status, error = %self, "request failed");
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ServiceError::InvalidBody.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ServiceError::InvalidCep(InvalidCep).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ServiceError::upstream("weather provider", "connection refused").status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ServiceError::Decode { target: "location provider" }.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ServiceError::Downstream { status: StatusCode::SERVICE_UNAVAILABLE }.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_not_found_policy_statuses() {
        let default = ServiceError::CepNotFound { policy: NotFoundPolicy::default() };
        assert_eq!(default.status(), StatusCode::NOT_FOUND);

        let legacy = ServiceError::CepNotFound { policy: NotFoundPolicy::Unprocessable };
        assert_eq!(legacy.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_invalid_cep_message_matches_response_body() {
        let err = ServiceError::InvalidCep(InvalidCep);
        assert_eq!(err.to_string(), "invalid zipcode");
    }
}
