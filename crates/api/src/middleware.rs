use axum::{
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;

use stockwise_observability::{REQUEST_ID_HEADER, RequestId};

/// Tag every request with a fresh id: a span around the handler and a response
/// header for the caller.
pub async fn request_id_middleware(
    req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let request_id = RequestId::new();
    let span = request_id.span(req.method().as_str(), req.uri().path());

    let mut response = next.run(req).instrument(span.clone()).await;

    span.in_scope(|| {
        tracing::info!(status = response.status().as_u16(), "request completed");
    });

    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
