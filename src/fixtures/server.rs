//! HTTP front for the fixture simulator.
//!
//! # Responsibilities
//! - Serve `FixtureState::respond` over real sockets (axum)
//! - Expose the bound address so endpoints can be overridden to it
//! - Shut down when the handle is told to or dropped

use std::net::SocketAddr;

use axum::{
    extract::{RawQuery, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use url::form_urlencoded;

use crate::fixtures::{FixtureResponse, FixtureState};
use crate::lifecycle::Shutdown;

/// Builder for the simulator's axum application.
pub struct FixtureServer {
    state: FixtureState,
}

impl FixtureServer {
    pub fn new(state: FixtureState) -> Self {
        Self { state }
    }

    /// The axum router; every path answers through the matcher.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(serve_fixture))
            .fallback(serve_fixture)
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http())
    }

    /// Bind `addr` and serve in the background.
    pub async fn bind(self, addr: &str) -> std::io::Result<FixtureHandle> {
        let listener = TcpListener::bind(addr).await?;
        self.spawn(listener)
    }

    /// Serve on an already bound listener in the background.
    pub fn spawn(self, listener: TcpListener) -> std::io::Result<FixtureHandle> {
        let addr = listener.local_addr()?;
        let app = self.router();
        let shutdown = Shutdown::new();
        let signalled = shutdown.signalled();

        tracing::info!(address = %addr, "Fixture server listening");

        let task = tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(signalled)
                .await;
            if let Err(e) = result {
                tracing::error!(error = %e, "Fixture server stopped with error");
            }
        });

        Ok(FixtureHandle {
            addr,
            state: self.state,
            shutdown,
            task: Some(task),
        })
    }
}

impl Default for FixtureServer {
    fn default() -> Self {
        Self::new(FixtureState::new())
    }
}

/// A running fixture server.
pub struct FixtureHandle {
    addr: SocketAddr,
    state: FixtureState,
    shutdown: Shutdown,
    task: Option<JoinHandle<()>>,
}

impl FixtureHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// `http://ip:port` of the running server.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn state(&self) -> &FixtureState {
        &self.state
    }

    /// Stop accepting connections and wait for the server task.
    pub async fn shutdown(mut self) {
        self.shutdown.trigger();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
        tracing::info!(address = %self.addr, "Fixture server stopped");
    }
}

impl Drop for FixtureHandle {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

async fn serve_fixture(State(state): State<FixtureState>, RawQuery(query): RawQuery) -> Response {
    let pairs: Vec<(String, String)> = form_urlencoded::parse(query.unwrap_or_default().as_bytes())
        .into_owned()
        .collect();

    state.respond(&pairs).into_response()
}

impl IntoResponse for FixtureResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, Json(self.body)).into_response();

        for (name, value) in self.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(&value),
            ) {
                (Ok(name), Ok(value)) => {
                    response.headers_mut().insert(name, value);
                }
                _ => tracing::warn!(header = %name, "Skipping invalid fixture header"),
            }
        }
        response
    }
}
