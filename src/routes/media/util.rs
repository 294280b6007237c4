use std::borrow::Cow;
use std::future::Future;

use actix_web::{
    http::StatusCode, web, FromRequest, Handler, HttpResponse, Resource, ResponseError, Responder,
};
use serde::Deserialize;
use serde_json::{json, Value};
use validator::{Validate, ValidationError};

use crate::cache::ResponseCache;
use crate::upstream::UpstreamError;
use crate::util::ResponseMessage;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("{message}")]
    Upstream { status: StatusCode, message: String },
}

impl ApiError {
    /// Mirrors the provider status and prefers its message over `fallback`.
    pub fn upstream(err: &UpstreamError, fallback: &str) -> Self {
        ApiError::Upstream {
            status: err.status_code(),
            message: err.provider_message().unwrap_or(fallback).to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Upstream { status, .. } => *status,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ResponseMessage {
            message: self.to_string(),
        })
    }
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required")
            .with_message(Cow::from("parameter can't be empty")));
    }
    Ok(())
}

/// Runs the path validators and turns any failure into a 400 carrying the
/// route's own message.
pub fn require_params(params: &impl Validate, message: &str) -> Result<(), ApiError> {
    if let Err(errors) = params.validate() {
        for (field, _) in errors.field_errors() {
            tracing::error!("Missing required path parameter `{}`", field);
        }
        return Err(ApiError::BadRequest(message.to_string()));
    }
    Ok(())
}

#[derive(Deserialize, Validate, Debug)]
pub struct MediaTypePath {
    #[validate(custom(function = "validate_not_blank"))]
    pub media_type: String,
}

#[derive(Deserialize, Debug)]
pub struct RegionQuery {
    pub region: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub region: Option<String>,
}

/// Requested page, with a missing or zero page read as the first one.
pub fn page_number(page: Option<u32>) -> u32 {
    page.unwrap_or(1).max(1)
}

impl PageQuery {
    pub fn page(&self) -> u32 {
        page_number(self.page)
    }
}

/// Serves `key` from the cache, or awaits `fetch`, wraps its payload as
/// `{"data": ...}`, caches the envelope and returns it.
pub async fn respond_cached<Fut>(
    cache: &ResponseCache,
    key: String,
    fallback: &str,
    fetch: Fut,
) -> Result<HttpResponse, ApiError>
where
    Fut: Future<Output = Result<Value, UpstreamError>>,
{
    if let Some(envelope) = cache.get(&key) {
        tracing::info!(cache_key = %key, "Serving cached response");
        return Ok(HttpResponse::Ok().json(envelope));
    }

    let payload = fetch
        .await
        .map_err(|err| ApiError::upstream(&err, fallback))?;
    let envelope = json!({ "data": payload });
    cache.set(key, envelope.clone());
    Ok(HttpResponse::Ok().json(envelope))
}

pub async fn method_not_allowed() -> Result<HttpResponse, ApiError> {
    Err(ApiError::MethodNotAllowed)
}

/// A resource answering GET with `handler` and every other method with 405.
pub fn get_only<F, Args>(path: &str, handler: F) -> Resource
where
    F: Handler<Args>,
    Args: FromRequest + 'static,
    F::Output: Responder + 'static,
{
    web::resource(path)
        .route(web::get().to(handler))
        .default_service(web::to(method_not_allowed))
}
