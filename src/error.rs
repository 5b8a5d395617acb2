use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::api::ErrorBody;
use crate::handler::AppState;

/// Input rejected before it reaches storage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("'{field}' is required")]
    Missing { field: &'static str },
    #[error("'{field}' must be a number")]
    Invalid { field: &'static str },
    #[error("'{field}' must be text")]
    NotText { field: &'static str },
    #[error("Request body must be a JSON object")]
    MalformedBody,
    #[error("Request body must contain either 'title', 'url', 'description', or 'rating'")]
    EmptyPatch,
}

impl ValidationError {
    pub fn field(&self) -> Option<&'static str> {
        use ValidationError::*;
        match self {
            Missing { field } | Invalid { field } | NotText { field } => Some(*field),
            MalformedBody | EmptyPatch => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BookmarkError {
    #[error("ValidationError: {0}")]
    Validation(#[from] ValidationError),
    #[error("NotFound: bookmark {0}")]
    NotFound(String),
    #[error("StorageError: {0:#}")]
    Storage(#[from] anyhow::Error),
}

/// Marks a response as an unhandled server failure. Carries the error chain
/// so the [`error_responder`] can decide how much of it the client sees.
#[derive(Debug, Clone)]
pub struct ServerFault {
    pub message: String,
    pub detail: String,
}

impl IntoResponse for BookmarkError {
    fn into_response(self) -> Response {
        match self {
            BookmarkError::Validation(e) => {
                (StatusCode::BAD_REQUEST, Json(ErrorBody::new(&e.to_string()))).into_response()
            }
            BookmarkError::NotFound(_) => {
                (StatusCode::NOT_FOUND, Json(ErrorBody::new("Bookmark doesn't exist"))).into_response()
            }
            BookmarkError::Storage(e) => {
                let detail = format!("{:#}", e);
                tracing::error!(error = %detail, "storage call failed");

                let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
                response.extensions_mut().insert(ServerFault {
                    message: e.to_string(),
                    detail,
                });
                response
            }
        }
    }
}

/// Process-wide renderer for server faults. Production gets an opaque
/// message, every other environment gets the raw error.
pub async fn error_responder(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let response = next.run(request).await;

    let Some(fault) = response.extensions().get::<ServerFault>().cloned() else {
        return response;
    };

    if state.environment.is_production() {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody::new("server error"))).into_response();
    }

    let body = json!({
        "message": fault.message,
        "error": { "detail": fault.detail },
    });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
