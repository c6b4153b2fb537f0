//! Error types for targets, providers and the decode adapter.
//!
//! # Design
//! Every failure a caller can observe is an `ApiError`. Transport failures
//! are passed through as `Transport`, decode failures are wrapped as
//! `Decode` with a `DecodeFailure` reason. Errors of unknown concrete type
//! go through `ApiError::normalize`, a checked downcast that falls back to
//! `UnknownDecode` instead of assuming the type.

use std::error::Error as StdError;

use thiserror::Error;

/// The single error type surfaced by the crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The transport could not complete the round-trip.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be decoded into the requested type.
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeFailure),

    /// A decode function failed with an error of unrecognised type.
    #[error("unknown decode error: {0}")]
    UnknownDecode(String),

    /// The target's base URL and path do not form a valid URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Why a payload could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeFailure {
    /// Not parseable at all: bad syntax, truncated input, invalid UTF-8.
    #[error("malformed payload: {0}")]
    Malformed(String),

    #[error("missing field `{0}`")]
    MissingField(String),

    /// Well-formed, but the shape does not match the target type.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),
}

impl From<serde_json::Error> for DecodeFailure {
    fn from(err: serde_json::Error) -> Self {
        use serde_json::error::Category;

        let message = err.to_string();
        match err.classify() {
            Category::Data => match missing_field(&message) {
                Some(field) => DecodeFailure::MissingField(field),
                None => DecodeFailure::TypeMismatch(message),
            },
            Category::Syntax | Category::Eof | Category::Io => DecodeFailure::Malformed(message),
        }
    }
}

impl From<std::str::Utf8Error> for DecodeFailure {
    fn from(err: std::str::Utf8Error) -> Self {
        DecodeFailure::Malformed(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for DecodeFailure {
    fn from(err: std::string::FromUtf8Error) -> Self {
        DecodeFailure::Malformed(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.into())
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError::InvalidUrl(err.to_string())
    }
}

impl From<Box<dyn StdError + Send + Sync + 'static>> for ApiError {
    fn from(err: Box<dyn StdError + Send + Sync + 'static>) -> Self {
        ApiError::normalize(err)
    }
}

impl ApiError {
    /// Map an arbitrary boxed error onto `ApiError`.
    ///
    /// Known decode error types keep their classification; anything else
    /// becomes `UnknownDecode` with the error's message.
    pub fn normalize(err: Box<dyn StdError + Send + Sync + 'static>) -> Self {
        let err = match err.downcast::<ApiError>() {
            Ok(api) => return *api,
            Err(other) => other,
        };
        let err = match err.downcast::<DecodeFailure>() {
            Ok(failure) => return ApiError::Decode(*failure),
            Err(other) => other,
        };
        let err = match err.downcast::<serde_json::Error>() {
            Ok(json) => return ApiError::from(*json),
            Err(other) => other,
        };
        let err = match err.downcast::<std::str::Utf8Error>() {
            Ok(utf8) => return ApiError::Decode((*utf8).into()),
            Err(other) => other,
        };
        match err.downcast::<std::string::FromUtf8Error>() {
            Ok(utf8) => ApiError::Decode((*utf8).into()),
            Err(other) => ApiError::UnknownDecode(other.to_string()),
        }
    }
}

/// Extract the field name from serde's "missing field `name`" message.
fn missing_field(message: &str) -> Option<String> {
    let rest = message.strip_prefix("missing field `")?;
    let end = rest.find('`')?;
    Some(rest[..end].to_string())
}
