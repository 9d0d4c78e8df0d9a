use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::{field, info_span, Instrument};
use uuid::Uuid;

/// HTTP header carrying the request id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest client-supplied id that is reused as-is
const MAX_CLIENT_ID_LEN: usize = 128;

/// Request id stored in request extensions
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Authenticated user id, attached to the response for the request span
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpanUserId(pub i64);

fn client_request_id(request: &Request) -> Option<String> {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty() && v.len() <= MAX_CLIENT_ID_LEN)
        .map(str::to_string)
}

/// Runs every request inside an `http_request` span tagged with a request id.
///
/// The id comes from the client's `X-Request-Id` header when present,
/// otherwise a fresh UUID v4. It is echoed back on the response.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = client_request_id(&request).unwrap_or_else(|| Uuid::new_v4().to_string());

    let span = info_span!(
        "http_request",
        request_id = %request_id,
        method = %request.method(),
        uri = %request.uri(),
        user_id = field::Empty,
    );

    tracing::debug!(parent: &span, "Request started");
    request.extensions_mut().insert(RequestId(request_id.clone()));

    let mut response = async move {
        let response = next.run(request).await;
        if let Some(SpanUserId(user_id)) = response.extensions().get::<SpanUserId>() {
            tracing::Span::current().record("user_id", *user_id);
        }
        tracing::info!(status = %response.status(), "Request completed");
        response
    }
    .instrument(span)
    .await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }

    response
}
