//! Request dispatch for targets, either stubbed or through a transport.
//!
//! # Design
//! The core never opens a connection. A `Provider` either answers from the
//! target's sample data or hands the built `HttpRequest` to a caller-supplied
//! `Transport`. Whatever the transport returns is passed on unchanged.

use std::fmt;
use std::sync::Arc;

use futures::future::{self, BoxFuture};
use futures::FutureExt;
use tracing::debug;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::target::Target;

/// Whether requests are answered from sample data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StubBehavior {
    /// Send every request through the transport.
    #[default]
    Never,
    /// Answer with `200` and the target's sample data, without I/O.
    Immediate,
}

/// Executes an `HttpRequest`. Implemented by the host on top of its own
/// HTTP client.
pub trait Transport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> ResponseFuture;
}

/// What `Provider::request` and `Transport::execute` hand back.
pub type ResponseFuture = BoxFuture<'static, Result<HttpResponse, ApiError>>;

#[derive(Clone, Default)]
pub struct Provider {
    transport: Option<Arc<dyn Transport>>,
    stub: StubBehavior,
}

impl Provider {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Some(Arc::new(transport)),
            stub: StubBehavior::Never,
        }
    }

    /// A provider that answers every request from sample data.
    pub fn stubbed() -> Self {
        Self {
            transport: None,
            stub: StubBehavior::Immediate,
        }
    }

    pub fn with_stub(mut self, stub: StubBehavior) -> Self {
        self.stub = stub;
        self
    }

    pub fn stub_behavior(&self) -> StubBehavior {
        self.stub
    }

    pub fn request<T: Target + ?Sized>(&self, target: &T) -> ResponseFuture {
        match self.stub {
            StubBehavior::Immediate => {
                let response = HttpResponse::new(200, target.sample_data());
                debug!(path = target.path(), bytes = response.body.len(), "stubbed response");
                future::ready(Ok(response)).boxed()
            }
            StubBehavior::Never => {
                let request = match target.build_request() {
                    Ok(request) => request,
                    Err(err) => return future::ready(Err(err)).boxed(),
                };
                match &self.transport {
                    Some(transport) => {
                        debug!(
                            method = request.method.as_str(),
                            url = %request.url,
                            "dispatching request"
                        );
                        transport.execute(request)
                    }
                    None => {
                        let err = ApiError::Transport("no transport configured".to_string());
                        future::ready(Err(err)).boxed()
                    }
                }
            }
        }
    }
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("transport", &self.transport.is_some())
            .field("stub", &self.stub)
            .finish()
    }
}
