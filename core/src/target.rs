//! Endpoint descriptors.
//!
//! # Design
//! A `Target` is pure metadata: where a request goes, how it is sent and what
//! a stub should answer. Implementations are usually closed enums matched
//! exhaustively, so adding a variant fails to compile until every property
//! handles it. `build_request` turns the metadata into an `HttpRequest`
//! without performing any I/O.

use url::Url;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};

/// How the request body is formed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestTask {
    /// No body; parameters, if any, go into the query string.
    #[default]
    Plain,
    /// A raw body sent as-is.
    Body(String),
}

/// Describes one endpoint of an API.
pub trait Target {
    /// Absolute base URL every path is resolved against.
    fn base_url(&self) -> &str;

    fn path(&self) -> &str;

    fn method(&self) -> HttpMethod;

    fn headers(&self) -> Option<Vec<(String, String)>> {
        None
    }

    fn parameters(&self) -> Option<Vec<(String, String)>> {
        None
    }

    fn task(&self) -> RequestTask {
        RequestTask::Plain
    }

    /// Payload a stubbing provider answers with.
    fn sample_data(&self) -> Vec<u8>;

    fn build_request(&self) -> Result<HttpRequest, ApiError> {
        build_request(self)
    }
}

/// Assemble the `HttpRequest` a target describes.
pub fn build_request<T: Target + ?Sized>(target: &T) -> Result<HttpRequest, ApiError> {
    let joined = format!(
        "{}/{}",
        target.base_url().trim_end_matches('/'),
        target.path().trim_start_matches('/')
    );
    let mut url = Url::parse(&joined)?;

    if let Some(parameters) = target.parameters().filter(|p| !p.is_empty()) {
        url.query_pairs_mut().extend_pairs(parameters);
    }

    let body = match target.task() {
        RequestTask::Plain => None,
        RequestTask::Body(body) => Some(body),
    };

    Ok(HttpRequest {
        method: target.method(),
        url: url.into(),
        headers: target.headers().unwrap_or_default(),
        body,
    })
}
