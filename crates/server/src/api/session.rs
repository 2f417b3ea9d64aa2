//! Session identity for cart routes.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    Json,
};
use serde::Serialize;
use std::future::Future;

use super::ErrorResponse;

/// Header carrying the opaque session id.
pub const SESSION_HEADER: &str = "x-session-id";

/// Session id taken from the `X-Session-Id` header.
#[derive(Debug, Clone)]
pub struct SessionId(pub String);

impl<S> FromRequestParts<S> for SessionId
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let session_id = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| SessionId(value.to_string()))
            .ok_or_else(|| {
                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: "Missing X-Session-Id header".to_string(),
                    }),
                )
            });
        std::future::ready(session_id)
    }
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: String,
}

/// Issue a fresh session id.
pub async fn create_session() -> (StatusCode, Json<SessionResponse>) {
    (
        StatusCode::CREATED,
        Json(SessionResponse {
            session_id: uuid::Uuid::new_v4().to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Result<SessionId, StatusCode> {
        let (mut parts, _) = request.into_parts();
        SessionId::from_request_parts(&mut parts, &())
            .await
            .map_err(|(status, _)| status)
    }

    #[tokio::test]
    async fn test_extracts_header() {
        let request = Request::builder()
            .header("X-Session-Id", " abc-123 ")
            .body(())
            .unwrap();
        let session = extract(request).await.unwrap();
        assert_eq!(session.0, "abc-123");
    }

    #[tokio::test]
    async fn test_missing_header_is_bad_request() {
        let request = Request::builder().body(()).unwrap();
        assert_eq!(extract(request).await.unwrap_err(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_blank_header_is_bad_request() {
        let request = Request::builder()
            .header(SESSION_HEADER, "   ")
            .body(())
            .unwrap();
        assert_eq!(extract(request).await.unwrap_err(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_session_issues_uuid() {
        let (status, Json(body)) = create_session().await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(uuid::Uuid::parse_str(&body.session_id).is_ok());
    }
}
