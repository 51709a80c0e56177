mod bootcamps;
mod cors;
mod failure;
mod health;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use devcamper_config::Config;
use devcamper_pipeline::Pipeline;
use devcamper_store::{BootcampRepository, InMemoryBootcamps};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

pub use bootcamps::JsonBody;
pub use failure::{ApiError, METHOD_NOT_ALLOWED, ROUTE_NOT_FOUND, normalize_failures};

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration with an in-memory bootcamp store
    pub fn new(config: &Config) -> Self {
        Self::with_repository(config, Arc::new(InMemoryBootcamps::new()))
    }

    /// Build the server from configuration over the given bootcamp store
    pub fn with_repository(config: &Config, repository: Arc<dyn BootcampRepository>) -> Self {
        let pipeline = Pipeline::new(config.errors.classifier());
        tracing::debug!(rules = pipeline.classifier().rules().len(), "failure classifier ready");

        let mut app = Router::new();

        // Health check
        if let Some(path) = config.server.health.route() {
            app = app.route(path, axum::routing::get(health::health_handler));
        }

        app = app
            .merge(bootcamps::router(repository))
            .fallback(failure::route_not_found)
            .method_not_allowed_fallback(failure::method_not_allowed);

        app = with_failure_handling(app, pipeline);

        // Tracing
        app = app.layer(TraceLayer::new_for_http());

        // CORS
        if let Some(ref cors_config) = config.server.cors {
            app = app.layer(cors::cors_layer(cors_config));
        }

        Self {
            router: app,
            listen_address: config.server.listen_address(),
        }
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
        let listener = tokio::net::TcpListener::bind(self.listen_address)
            .await
            .map_err(|e| anyhow::anyhow!("failed to bind {}: {e}", self.listen_address))?;
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

/// Wrap `router` so every failure below, panics included, leaves as an envelope
fn with_failure_handling(router: Router, pipeline: Pipeline) -> Router {
    router
        .layer(CatchPanicLayer::custom(failure::panic_response))
        .layer(axum::middleware::from_fn(move |req, next| {
            let pipeline = pipeline.clone();
            async move { failure::normalize_failures(pipeline, req, next).await }
        }))
}
