//! Beacon signaling server.
//!
//! The transport boundary around `beacon-core`: accepts WebSocket
//! connections, resolves each one's room, and runs one relay loop per
//! connection. Also serves the bundled demo page when a static directory is
//! configured.
//!
//! ## Architecture
//!
//! ```text
//! beacon-server
//!   ├─ Server        (bind → run, axum over a pre-bound listener)
//!   ├─ ws            (upgrade handler, writer task, Inbound adapter)
//!   └─ RoomRegistry  (from beacon-core, one per server)
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod ws;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use axum::extract::ws::Utf8Bytes;
use axum::routing::get;
use beacon_core::RoomRegistry;
pub use error::ServerError;
use tokio::net::TcpListener;
use tower_http::services::{ServeDir, ServeFile};

/// The registry shared by every connection handler of one server.
pub type SharedRegistry = Arc<RoomRegistry<Utf8Bytes>>;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (e.g. "0.0.0.0:8000").
    pub bind_address: String,
    /// Directory holding `index.html` and static assets; `None` disables
    /// static serving.
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_address: "0.0.0.0:8000".to_string(), static_dir: None }
    }
}

/// Shared application state passed to axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Room membership for this server.
    pub registry: SharedRegistry,
}

/// Build the router: the relay endpoint, plus the demo page when configured.
pub fn build_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let mut router = Router::new().route("/ws", get(ws::ws_handler)).with_state(state);
    if let Some(dir) = static_dir {
        router = router
            .route_service("/", ServeFile::new(dir.join("index.html")))
            .nest_service("/static", ServeDir::new(dir));
    }
    router
}

/// Beacon signaling server.
///
/// Binds first so callers (tests included) can bind port 0 and read the
/// resulting address before serving.
pub struct Server {
    registry: SharedRegistry,
    listener: TcpListener,
    static_dir: Option<PathBuf>,
}

impl Server {
    /// Create the registry and bind the listen address.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] when the address cannot be bound.
    pub async fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(&config.bind_address)
            .await
            .map_err(|source| ServerError::Bind { addr: config.bind_address.clone(), source })?;
        Ok(Self {
            registry: Arc::new(RoomRegistry::new()),
            listener,
            static_dir: config.static_dir,
        })
    }

    /// The local address the server is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// A handle to this server's registry, for observation in tests.
    pub fn registry(&self) -> SharedRegistry {
        Arc::clone(&self.registry)
    }

    /// Serve connections until shut down or a transport error occurs.
    pub async fn run(self) -> Result<(), ServerError> {
        let state = AppState { registry: Arc::clone(&self.registry) };
        let router = build_router(state, self.static_dir.as_deref());
        axum::serve(self.listener, router).await?;
        Ok(())
    }
}
