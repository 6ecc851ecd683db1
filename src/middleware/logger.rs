use axum::{extract::Request, http::header, middleware::Next, response::Response};
use tracing::info;

/// Audit log of the caller's host and the requested path.
///
/// Attached to selected routes only; it never short-circuits.
pub async fn request_logger(req: Request, next: Next) -> Response {
    let host = req
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-");
    info!(method = %req.method(), %host, path = %req.uri().path(), "Called");

    next.run(req).await
}
