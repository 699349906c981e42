use axum::{extract::Request, middleware::Next, response::Response};

/// Response marker: the access log skips requests carrying it.
#[derive(Debug, Clone, Copy)]
pub struct DisableLog;

/// Middleware: mark every response of the wrapped routes as not logged
pub async fn disable_log(req: Request, next: Next) -> Response {
    let mut resp = next.run(req).await;
    resp.extensions_mut().insert(DisableLog);
    resp
}
