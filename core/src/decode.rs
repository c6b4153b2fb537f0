//! Response decode adapter.
//!
//! # Overview
//! Lifts a fallible, synchronous decode function over an `HttpResponse` into
//! a lazily evaluated one-shot future that resolves to the decoded value or
//! an `ApiError`.
//!
//! # Design
//! - `Producer` is cold. It owns the response and the decode function and
//!   does nothing until subscribed.
//! - Each `subscribe()` yields an independent `Subscription`; the decode
//!   function runs once per subscription, on its first poll. Results are
//!   never shared between subscriptions.
//! - A subscription cancelled before its first poll never runs the decode
//!   function and resolves to `None`. Dropping it has the same effect.
//! - Decode errors are converted with `Into<ApiError>`, so only the one
//!   error type ever reaches the caller.

use std::any::type_name;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::future::{self, AbortHandle, Abortable, BoxFuture};
use futures::{FutureExt, TryFutureExt};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ApiError;
use crate::http::HttpResponse;

type DecodeFn<T> = dyn Fn(&HttpResponse) -> Result<T, ApiError> + Send + Sync;

/// A cold, re-subscribable decode of one response.
pub struct Producer<T> {
    response: Arc<HttpResponse>,
    decode: Arc<DecodeFn<T>>,
}

impl<T> Clone for Producer<T> {
    fn clone(&self) -> Self {
        Self {
            response: Arc::clone(&self.response),
            decode: Arc::clone(&self.decode),
        }
    }
}

impl<T: Send + 'static> Producer<T> {
    pub fn new<F, E>(response: HttpResponse, decode: F) -> Self
    where
        F: Fn(&HttpResponse) -> Result<T, E> + Send + Sync + 'static,
        E: Into<ApiError>,
    {
        Self {
            response: Arc::new(response),
            decode: Arc::new(move |response: &HttpResponse| {
                decode(response).map_err(Into::<ApiError>::into)
            }),
        }
    }

    /// Start an independent, cancellable evaluation.
    pub fn subscribe(&self) -> Subscription<T> {
        let (handle, registration) = AbortHandle::new_pair();
        Subscription {
            inner: Abortable::new(self.evaluate(), registration),
            handle,
        }
    }

    /// Evaluate once, for callers that cancel by dropping the future.
    pub fn into_future(self) -> BoxFuture<'static, Result<T, ApiError>> {
        self.evaluate()
    }

    fn evaluate(&self) -> BoxFuture<'static, Result<T, ApiError>> {
        let response = Arc::clone(&self.response);
        let decode = Arc::clone(&self.decode);
        future::lazy(move |_| run_decode(&response, decode.as_ref())).boxed()
    }
}

fn run_decode<T>(response: &HttpResponse, decode: &DecodeFn<T>) -> Result<T, ApiError> {
    debug!(
        target_type = type_name::<T>(),
        status = response.status,
        bytes = response.body.len(),
        "decoding response"
    );
    let result = decode(response);
    if let Err(err) = &result {
        debug!(target_type = type_name::<T>(), error = %err, "decode failed");
    }
    result
}

/// One evaluation of a `Producer`.
///
/// Resolves to `Some(result)` exactly once, or to `None` if cancelled before
/// the decode ran.
pub struct Subscription<T> {
    inner: Abortable<BoxFuture<'static, Result<T, ApiError>>>,
    handle: AbortHandle,
}

impl<T> Subscription<T> {
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        self.handle.is_aborted()
    }

    /// A handle that can cancel this subscription from elsewhere.
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle(self.handle.clone())
    }
}

impl<T> Future for Subscription<T> {
    type Output = Option<Result<T, ApiError>>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.get_mut().inner.poll_unpin(cx).map(Result::ok)
    }
}

#[derive(Debug, Clone)]
pub struct CancelHandle(AbortHandle);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.is_aborted()
    }
}

/// Decode a single value out of `response` with `decode`.
pub fn decode_single<T, F, E>(response: HttpResponse, decode: F) -> Producer<T>
where
    T: Send + 'static,
    F: Fn(&HttpResponse) -> Result<T, E> + Send + Sync + 'static,
    E: Into<ApiError>,
{
    Producer::new(response, decode)
}

/// Decode an ordered collection out of `response` with `decode`. The order
/// `decode` produces is the order delivered.
pub fn decode_collection<T, F, E>(response: HttpResponse, decode: F) -> Producer<Vec<T>>
where
    T: Send + 'static,
    F: Fn(&HttpResponse) -> Result<Vec<T>, E> + Send + Sync + 'static,
    E: Into<ApiError>,
{
    Producer::new(response, decode)
}

/// `decode_single` with the JSON decoder.
pub fn decode_json<T>(response: HttpResponse) -> Producer<T>
where
    T: DeserializeOwned + Send + 'static,
{
    decode_single(response, HttpResponse::map_to::<T>)
}

/// `decode_collection` with the JSON decoder.
pub fn decode_json_array<T>(response: HttpResponse) -> Producer<Vec<T>>
where
    T: DeserializeOwned + Send + 'static,
{
    decode_collection(response, HttpResponse::map_array::<T>)
}

impl HttpResponse {
    /// Decode the body as a JSON object of type `T`.
    pub fn map_to<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Decode the body as a JSON array of `T`, preserving element order.
    pub fn map_array<T: DeserializeOwned>(&self) -> Result<Vec<T>, ApiError> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Decode combinators for futures that yield a response.
///
/// An upstream error is passed through untouched and the decode is skipped.
/// The decode runs only once the upstream response has arrived. Dropping the
/// returned future cancels it: if the response has not arrived yet, the
/// decode function is never invoked and nothing is delivered.
pub trait ResponseFutureExt:
    Future<Output = Result<HttpResponse, ApiError>> + Sized + Send + 'static
{
    fn decode_with<T, F, E>(self, decode: F) -> BoxFuture<'static, Result<T, ApiError>>
    where
        T: Send + 'static,
        F: Fn(&HttpResponse) -> Result<T, E> + Send + Sync + 'static,
        E: Into<ApiError>,
    {
        self.and_then(move |response| decode_single(response, decode).into_future())
            .boxed()
    }

    fn map_to<T>(self) -> BoxFuture<'static, Result<T, ApiError>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.decode_with(HttpResponse::map_to::<T>)
    }

    fn map_array<T>(self) -> BoxFuture<'static, Result<Vec<T>, ApiError>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.decode_with(HttpResponse::map_array::<T>)
    }
}

impl<F> ResponseFutureExt for F where
    F: Future<Output = Result<HttpResponse, ApiError>> + Send + 'static
{
}
