use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;

/// Directory the served payloads are read from, one `<name>.json` per route.
#[derive(Clone, Debug)]
pub struct Fixtures {
    dir: Arc<PathBuf>,
}

impl Fixtures {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Arc::new(dir.into()),
        }
    }

    async fn load(&self, name: &str) -> Option<Vec<u8>> {
        tokio::fs::read(self.dir.join(format!("{name}.json"))).await.ok()
    }
}

pub fn app(fixtures: Fixtures) -> Router {
    Router::new()
        .route("/object", get(object))
        .route("/array", get(array))
        .with_state(fixtures)
}

pub async fn run(listener: TcpListener, fixtures: Fixtures) -> Result<(), std::io::Error> {
    axum::serve(listener, app(fixtures)).await
}

async fn object(State(fixtures): State<Fixtures>) -> Response {
    serve(&fixtures, "object").await
}

async fn array(State(fixtures): State<Fixtures>) -> Response {
    serve(&fixtures, "array").await
}

async fn serve(fixtures: &Fixtures, name: &str) -> Response {
    match fixtures.load(name).await {
        Some(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        None => {
            tracing::warn!(fixture = name, dir = %fixtures.dir.display(), "fixture missing");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}
