//! Endpoint descriptors and a response decode adapter.
//!
//! # Overview
//! Targets describe endpoints as data (`Target`, `ExampleApi`) and can stub
//! their responses from bundled fixtures (`FixtureBundle`). The decode
//! adapter (`decode_single`, `decode_collection`, `ResponseFutureExt`) turns
//! a response plus a fallible decode function into a one-shot future that
//! yields the decoded value or a single `ApiError`.
//!
//! # Design
//! - Host-does-IO: the crate builds `HttpRequest` values and consumes
//!   `HttpResponse` values. Executing the round-trip is left to a
//!   caller-supplied `Transport`.
//! - Decoding is lazy and per-subscription; cancellation before the first
//!   poll skips the decode entirely.
//! - Every failure surfaces as `ApiError`; foreign error types are mapped by
//!   a checked conversion, never assumed.

pub mod decode;
pub mod error;
pub mod example_api;
pub mod fixtures;
pub mod http;
pub mod provider;
pub mod target;
pub mod types;

pub use decode::{
    decode_collection, decode_json, decode_json_array, decode_single, CancelHandle, Producer,
    ResponseFutureExt, Subscription,
};
pub use error::{ApiError, DecodeFailure};
pub use example_api::ExampleApi;
pub use fixtures::FixtureBundle;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use provider::{Provider, ResponseFuture, StubBehavior, Transport};
pub use target::{RequestTask, Target};
pub use types::Record;
