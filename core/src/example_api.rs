//! The example API: two read-only endpoints stubbed from bundled JSON.

use crate::fixtures::FixtureBundle;
use crate::http::HttpMethod;
use crate::target::{RequestTask, Target};

const BASE_URL: &str = "https://www.google.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExampleApi {
    /// A single record.
    Object,
    /// A list of records.
    Array,
}

impl ExampleApi {
    pub const ALL: [ExampleApi; 2] = [ExampleApi::Object, ExampleApi::Array];

    /// Name of the bundled `.json` fixture backing this endpoint.
    pub fn fixture_name(&self) -> &'static str {
        match self {
            ExampleApi::Object => "object",
            ExampleApi::Array => "array",
        }
    }

    pub fn sample_data_from(&self, bundle: &FixtureBundle) -> Vec<u8> {
        bundle.data(self.fixture_name(), "json", "")
    }
}

impl Target for ExampleApi {
    fn base_url(&self) -> &str {
        BASE_URL
    }

    fn path(&self) -> &str {
        match self {
            ExampleApi::Object => "object",
            ExampleApi::Array => "array",
        }
    }

    fn method(&self) -> HttpMethod {
        HttpMethod::Get
    }

    fn headers(&self) -> Option<Vec<(String, String)>> {
        None
    }

    fn parameters(&self) -> Option<Vec<(String, String)>> {
        None
    }

    fn task(&self) -> RequestTask {
        RequestTask::Plain
    }

    fn sample_data(&self) -> Vec<u8> {
        self.sample_data_from(&FixtureBundle::main())
    }
}
