//! End-to-end decode against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, points the example endpoints at
//! it through a local `Target`, and executes requests over real HTTP with a
//! ureq-backed `Transport`. The decoded results must match the stubbed path.

use endpoint_core::{
    ApiError, ExampleApi, FixtureBundle, HttpMethod, HttpRequest, HttpResponse, Provider, Record,
    ResponseFuture, ResponseFutureExt, Target, Transport,
};
use futures::executor::block_on;
use futures::future;
use futures::FutureExt;

/// Execute an `HttpRequest` with ureq.
///
/// Disables ureq's status-code-as-error behavior so 4xx/5xx responses come
/// back as data; only connection failures map to `ApiError::Transport`.
struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    fn execute_blocking(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
        let result = match req.method {
            HttpMethod::Get => self.agent.get(&req.url).call(),
            HttpMethod::Delete => self.agent.delete(&req.url).call(),
            HttpMethod::Post => {
                let body = req.body.unwrap_or_default();
                self.agent.post(&req.url).send(body.as_bytes())
            }
            HttpMethod::Put => {
                let body = req.body.unwrap_or_default();
                self.agent.put(&req.url).send(body.as_bytes())
            }
        };
        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();
        let body = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(HttpResponse { status, headers, body })
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> ResponseFuture {
        future::ready(self.execute_blocking(request)).boxed()
    }
}

/// An example endpoint rebased onto the mock server, stubbed from the
/// shipped fixtures.
struct Local<'a> {
    base: &'a str,
    path: &'a str,
}

impl<'a> Local<'a> {
    fn api(base: &'a str, api: ExampleApi) -> Self {
        Self {
            base,
            path: api.fixture_name(),
        }
    }
}

impl Target for Local<'_> {
    fn base_url(&self) -> &str {
        self.base
    }

    fn path(&self) -> &str {
        self.path
    }

    fn method(&self) -> HttpMethod {
        HttpMethod::Get
    }

    fn sample_data(&self) -> Vec<u8> {
        FixtureBundle::bundled().data(self.path, "json", "")
    }
}

fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            let fixtures = mock_server::Fixtures::new(FixtureBundle::bundled().root());
            mock_server::run(listener, fixtures).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

#[test]
fn live_and_stubbed_paths_agree() {
    let base = start_server();
    let live = Provider::new(UreqTransport::new());
    let stubbed = Provider::stubbed();
    let object = Local::api(&base, ExampleApi::Object);
    let array = Local::api(&base, ExampleApi::Array);

    // Step 1: object over HTTP.
    let record = block_on(live.request(&object).map_to::<Record>()).unwrap();
    assert_eq!(record, Record { id: 1 });

    // Step 2: object from the bundled stub.
    let stub_record = block_on(stubbed.request(&object).map_to::<Record>()).unwrap();
    assert_eq!(stub_record, record);

    // Step 3: array over HTTP, order preserved.
    let records = block_on(live.request(&array).map_array::<Record>()).unwrap();
    assert_eq!(records, vec![Record { id: 1 }, Record { id: 2 }]);

    // Step 4: array from the bundled stub.
    let stub_records = block_on(stubbed.request(&array).map_array::<Record>()).unwrap();
    assert_eq!(stub_records, records);

    // Step 5: unknown path, status surfaced as an error.
    let missing = Local {
        base: &base,
        path: "missing",
    };
    let response = block_on(live.request(&missing)).unwrap();
    assert_eq!(response.status, 404);
    let err = response.filter_successful_status_codes().unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 404, .. }));

    // Step 6: a 404 body is not a record.
    let err = block_on(live.request(&missing).map_to::<Record>()).unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[test]
fn connection_failure_passes_through_decode() {
    // Bind then drop to get a port nothing listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let base = format!("http://{addr}");
    let live = Provider::new(UreqTransport::new());

    let object = Local::api(&base, ExampleApi::Object);
    let err = block_on(live.request(&object).map_to::<Record>()).unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
