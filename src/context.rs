use axum::{
    extract::{FromRequestParts, Request},
    http::{request::Parts, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";
pub const TRACE_ID_HEADER: &str = "x-trace-id";

/// Identifiers carried across a request, with declared fields instead of a
/// stringly-keyed ambient map.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
    pub trace_id: Option<String>,
}

impl RequestContext {
    /// Fresh context with a generated request id and no trace id.
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            trace_id: None,
        }
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Extractor for handlers: `async fn handler(ctx: RequestContext) -> ...`.
/// Falls back to a fresh context when the middleware is not installed.
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_default())
    }
}

/// Middleware: adopt `x-request-id` / `x-trace-id` from the caller (minting a
/// request id when absent), expose the context to handlers via extensions,
/// and echo the request id on the response.
pub async fn propagate_ids(mut request: Request, next: Next) -> Response {
    let request_id = header_string(&request, REQUEST_ID_HEADER)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let trace_id = header_string(&request, TRACE_ID_HEADER);

    let context = RequestContext {
        request_id: request_id.clone(),
        trace_id,
    };
    request.extensions_mut().insert(context);

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

fn header_string(request: &Request, name: &str) -> Option<String> {
    request
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_context_generates_a_request_id() {
        let ctx = RequestContext::new();
        assert!(!ctx.request_id.is_empty());
        assert!(ctx.trace_id.is_none());
    }

    #[test]
    fn trace_id_is_attachable() {
        let ctx = RequestContext::new().with_trace_id("trace-1");
        assert_eq!(ctx.trace_id.as_deref(), Some("trace-1"));
    }
}
