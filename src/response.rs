use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::context::RequestContext;
use crate::error::{error_chain, Error};

/// Standard response envelope: success carries code 0 and the payload,
/// failure carries the domain error's stable code and empty data. Raw store
/// error text never leaks beyond what the message field intentionally says.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    #[serde(skip)]
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: 0,
            message: "success".to_string(),
            data,
            request_id: None,
            timestamp: unix_now(),
            trace_id: None,
            status: StatusCode::OK,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Stamp the envelope with the request/trace identifiers.
    pub fn with_context(mut self, ctx: &RequestContext) -> Self {
        self.request_id = Some(ctx.request_id.clone());
        self.trace_id = ctx.trace_id.clone();
        self
    }
}

impl ApiResponse<()> {
    /// Failure envelope for a domain error. Logs the flattened cause chain
    /// here, where code, ids, and cause are all in hand.
    pub fn failure(err: &Error, ctx: Option<&RequestContext>) -> Self {
        tracing::error!(
            code = err.code().value(),
            message = %err.message(),
            request_id = ctx.map(|c| c.request_id.as_str()),
            trace_id = ctx.and_then(|c| c.trace_id.as_deref()),
            error_chain = %error_chain(err),
            "request failed"
        );

        Self {
            code: err.code().value(),
            message: err.message().to_owned(),
            data: (),
            request_id: ctx.map(|c| c.request_id.clone()),
            timestamp: unix_now(),
            trace_id: ctx.and_then(|c| c.trace_id.clone()),
            status: err
                .http_status()
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        ApiResponse::failure(&self, None).into_response()
    }
}

/// Paginated payload for list endpoints.
#[derive(Debug, Serialize)]
pub struct PageResult<T> {
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub list: Vec<T>,
}

impl<T> PageResult<T> {
    pub fn new(list: Vec<T>, total: u64, page: u64, page_size: u64) -> Self {
        Self {
            total,
            page,
            page_size,
            list,
        }
    }
}

fn unix_now() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}
