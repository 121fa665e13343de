mod client_id;
mod cors;

use std::net::SocketAddr;

use axum::Router;
use axum::response::IntoResponse;
use brewshot_config::Config;
use tower_http::trace::TraceLayer;

/// Liveness probe; does not contact the provider
async fn health_handler() -> impl IntoResponse {
    (http::StatusCode::OK, "ok")
}

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the studio fails to initialize
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let listen_address = config
            .server
            .listen_address
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

        let studio = brewshot_studio::build_server(config)?;
        let max_upload_bytes = studio.settings().max_upload_bytes;

        let mut app = Router::new();

        // Health check
        if config.server.health.enabled {
            app = app.route(&config.server.health.path, axum::routing::get(health_handler));
        }

        // Studio routes
        app = app.merge(brewshot_studio::endpoint_router(max_upload_bytes).with_state(studio));

        // Apply middleware layers (innermost first)

        // Client identification
        if let Some(ref client_id_config) = config.server.client_identification {
            let cid_config = client_id_config.clone();
            app = app.layer(axum::middleware::from_fn(move |req, next| {
                let config = cid_config.clone();
                async move { client_id::client_id_middleware(config, req, next).await }
            }));
        }

        // Tracing
        app = app.layer(TraceLayer::new_for_http());

        // CORS
        if let Some(ref cors_config) = config.server.cors {
            let identity_headers: Vec<String> = config
                .server
                .client_identification
                .iter()
                .flat_map(|cid| std::iter::once(cid.client_id_header.clone()).chain(cid.group_header.clone()))
                .collect();
            app = app.layer(cors::cors_layer(cors_config, &identity_headers));
        }

        Ok(Self {
            router: app,
            listen_address,
        })
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}
