use std::fmt;

use axum::{
    body::Body,
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Header carrying the per-request correlation id, in both directions
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Correlation id attached to every request as an extension
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Caller-supplied id, accepted only when it is a UUID
    fn from_header(value: &HeaderValue) -> Option<Self> {
        let raw = value.to_str().ok()?;
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Resolves the id for an incoming request and echoes it on the response
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let id = match request.headers().get(REQUEST_ID_HEADER) {
        Some(value) => RequestId::from_header(value).unwrap_or_else(RequestId::generate),
        None => RequestId::generate(),
    };
    request.extensions_mut().insert(id.clone());

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

fn span_request_id(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<RequestId>()
        .map_or_else(|| "-".to_string(), RequestId::to_string)
}

/// `MakeSpan` for `TraceLayer`; expects `request_id_middleware` to run first
pub fn make_span_with_request_id(request: &Request<Body>) -> tracing::Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %span_request_id(request),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_parsing() {
        let id = Uuid::new_v4();
        let value = HeaderValue::from_str(&format!(" {id} ")).unwrap();
        assert_eq!(RequestId::from_header(&value).map(|r| r.0), Some(id));

        let garbage = HeaderValue::from_static("not-an-id");
        assert!(RequestId::from_header(&garbage).is_none());
    }

    #[test]
    fn test_span_request_id_fallback() {
        let request = axum::http::Request::builder()
            .uri("/api/v1/health")
            .body(Body::empty())
            .unwrap();
        assert_eq!(span_request_id(&request), "-");

        let mut request = request;
        let id = RequestId::generate();
        request.extensions_mut().insert(id.clone());
        assert_eq!(span_request_id(&request), id.to_string());
    }

    #[test]
    fn test_display_matches_uuid() {
        let request_id = RequestId::generate();
        assert_eq!(request_id.to_string(), request_id.0.to_string());
    }
}
