use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};

use crate::extract::ExtractionError;
use crate::models::{ErrorBody, ExtractRequest, ExtractResponse, HealthResponse};
use crate::validate::is_allowed_url;
use crate::AppState;

const INDEX_HTML: &str = include_str!("../static/index.html");

pub const MSG_INVALID_URL: &str = "Please provide a valid Sora link.";
pub const MSG_NO_PROMPT: &str = "No prompt found.";
pub const MSG_FETCH_FAILED: &str = "Could not fetch the Sora page.";
pub const MSG_TIMEOUT: &str = "Request to Sora timed out.";
pub const MSG_SERVER_ERROR: &str = "Server Error";

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn extract_endpoint(
    State(state): State<AppState>,
    payload: Result<Json<ExtractRequest>, JsonRejection>,
) -> Response {
    let url = match payload {
        Ok(Json(ExtractRequest { url: Some(url) })) => url,
        Ok(_) => return error_response(&ExtractionError::InvalidUrl),
        Err(rejection) => {
            tracing::warn!(error = %rejection, "rejected extract request body");
            return error_response(&ExtractionError::InvalidUrl);
        }
    };

    if !is_allowed_url(&url, &state.config.allowed_domain) {
        tracing::warn!(url = %url, "url failed allowlist check");
        return error_response(&ExtractionError::InvalidUrl);
    }

    match state.extractor.extract(url.trim()).await {
        Ok(prompt) => {
            tracing::info!(url = %url, chars = prompt.len(), "prompt extracted");
            (StatusCode::OK, Json(ExtractResponse { prompt })).into_response()
        }
        Err(e) => {
            match &e {
                ExtractionError::NoPrompt => tracing::info!(url = %url, "no prompt on page"),
                _ => tracing::error!(url = %url, error = ?e, "extraction failed"),
            }
            error_response(&e)
        }
    }
}

/// Status and client-facing message for each failure. Internal detail
/// stays in the logs.
pub fn status_and_message(err: &ExtractionError) -> (StatusCode, &'static str) {
    match err {
        ExtractionError::InvalidUrl => (StatusCode::BAD_REQUEST, MSG_INVALID_URL),
        ExtractionError::NoPrompt => (StatusCode::NOT_FOUND, MSG_NO_PROMPT),
        ExtractionError::Timeout => (StatusCode::GATEWAY_TIMEOUT, MSG_TIMEOUT),
        ExtractionError::Request(_) | ExtractionError::Upstream(_) => {
            (StatusCode::BAD_GATEWAY, MSG_FETCH_FAILED)
        }
        ExtractionError::Unexpected(_) => (StatusCode::INTERNAL_SERVER_ERROR, MSG_SERVER_ERROR),
    }
}

fn error_response(err: &ExtractionError) -> Response {
    let (status, message) = status_and_message(err);
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_every_failure_to_its_status() {
        let cases = [
            (ExtractionError::InvalidUrl, 400, MSG_INVALID_URL),
            (ExtractionError::NoPrompt, 404, MSG_NO_PROMPT),
            (ExtractionError::Timeout, 504, MSG_TIMEOUT),
            (
                ExtractionError::Request("ConnectError: refused".into()),
                502,
                MSG_FETCH_FAILED,
            ),
            (
                ExtractionError::Upstream(StatusCode::SERVICE_UNAVAILABLE),
                502,
                MSG_FETCH_FAILED,
            ),
            (
                ExtractionError::Unexpected("boom".into()),
                500,
                MSG_SERVER_ERROR,
            ),
        ];
        for (err, status, message) in cases {
            assert_eq!(status_and_message(&err), (StatusCode::from_u16(status).unwrap(), message));
        }
    }

    #[test]
    fn messages_do_not_leak_detail() {
        let (_, message) =
            status_and_message(&ExtractionError::Request("dns error: secret.internal".into()));
        assert!(!message.contains("secret"));
    }
}
