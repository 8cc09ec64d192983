//! Extractor error handlers
//!
//! Malformed JSON bodies, query strings and path segments are reported with
//! the same body shape as `AppError` responses.

use actix_web::{
    error::{JsonPayloadError, PathError, QueryPayloadError},
    Error, HttpMessage, HttpRequest,
};

use crate::core::AppError;
use crate::middleware::request_id::RequestIdValue;

/// Handler for `web::JsonConfig`
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> Error {
    log_error(req, &err);
    AppError::invalid_input(format!("Invalid JSON body: {}", err)).into()
}

/// Handler for `web::QueryConfig`
pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> Error {
    log_error(req, &err);
    AppError::invalid_input(format!("Invalid query string: {}", err)).into()
}

/// Handler for `web::PathConfig`
pub fn path_error_handler(err: PathError, req: &HttpRequest) -> Error {
    log_error(req, &err);
    AppError::invalid_input(format!("Invalid path parameter: {}", err)).into()
}

fn log_error(req: &HttpRequest, err: &dyn std::fmt::Display) {
    let request_id = req
        .extensions()
        .get::<RequestIdValue>()
        .map(|id| id.0.clone())
        .unwrap_or_default();

    tracing::warn!(
        request_id = %request_id,
        method = %req.method(),
        path = %req.path(),
        error = %err,
        "Rejected malformed request"
    );
}
