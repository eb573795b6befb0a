#![allow(clippy::must_use_candidate)]

mod boundary;
mod error;
mod health;
mod probes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use faultline_config::Config;
use faultline_notify::Dispatch;
use faultline_responder::ErrorResponder;
use faultline_telemetry::BoundaryMetrics;
use tower_http::trace::TraceLayer;

pub use boundary::{Boundary, error_boundary_middleware, with_error_boundary};
pub use error::ApiError;

/// Assembled server with the error boundary around every route
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration around the application routes
    ///
    /// Must be called from within a Tokio runtime when notifications are
    /// enabled, since the dispatcher spawns its delivery task.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured notifier cannot be constructed
    pub fn new(config: &Config, routes: Router) -> anyhow::Result<Self> {
        let listen_address = config
            .server
            .listen_address
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

        let metrics = BoundaryMetrics::new();

        let dispatcher = faultline_notify::create_dispatcher(&config.notifier, metrics.clone())?
            .map(|dispatcher| Arc::new(dispatcher) as Arc<dyn Dispatch>);

        let responder = ErrorResponder::from_config(&config.responder, dispatcher).with_metrics(metrics);

        let mode = responder.mode();

        tracing::info!(
            mode = %mode,
            notifications = config.notifier.enabled,
            "error responder ready"
        );

        let boundary = Boundary::new(Arc::new(responder), config.responder.max_captured_body_bytes);

        let mut app = Router::new();

        // Health check
        if config.server.health.enabled {
            app = app.route(
                &config.server.health.path,
                health::route(mode, config.notifier.enabled),
            );
        }

        // Diagnostic probes
        if config.server.probes.enabled {
            tracing::warn!(path = %config.server.probes.path, "diagnostic probe routes enabled");
            app = app.nest(&config.server.probes.path, probes::router());
        }

        // Application routes
        app = app.merge(routes);

        // Error boundary, then tracing outermost
        app = with_error_boundary(app, boundary);
        app = app.layer(TraceLayer::new_for_http());

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
    /// Useful for testing when the caller manages the listener. Serve it with
    /// `into_make_service_with_connect_info::<SocketAddr>()` so peer
    /// addresses reach notifications.
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

        axum::serve(
            listener,
            self.router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
            tracing::info!("graceful shutdown initiated");
        })
        .await?;

        Ok(())
    }
}
