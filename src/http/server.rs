//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the gateway handler
//! - Wire up middleware (tracing, request ID, traffic recorder, timeout)
//! - Apply hot-reloaded policy snapshots
//! - Serve with graceful shutdown bounded by a fixed grace period

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::any;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc, oneshot};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::http::request::RequestIdLayer;
use crate::lifecycle::signals;
use crate::policy::{PolicyHandle, PolicySnapshot};
use crate::proxy::handler::{gateway_handler, AppState};
use crate::proxy::upstream::{UpstreamClient, UpstreamError};
use crate::recorder::record_traffic;

/// Fixed grace period for in-flight requests once shutdown begins.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// HTTP server for the policy gateway.
pub struct HttpServer {
    router: Router,
    policy: Arc<PolicyHandle>,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, UpstreamError> {
        let policy = Arc::new(PolicyHandle::new(PolicySnapshot::from_config(&config)));
        let upstream = Arc::new(UpstreamClient::new(
            &config.target_url,
            &config.target_port,
        )?);

        let state = AppState {
            policy: policy.clone(),
            upstream,
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            policy,
            config,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(gateway_handler))
            .route("/", any(gateway_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(axum::middleware::from_fn(record_traffic))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Configuration updates from the watcher replace the policy snapshot
    /// wholesale. Shutdown (OS signal or coordinator trigger) stops the
    /// accept loop and gives in-flight requests [`SHUTDOWN_GRACE`] to
    /// finish before the rest are aborted.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<GatewayConfig>,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        let policy = self.policy.clone();
        tokio::spawn(async move {
            while let Some(new_config) = config_updates.recv().await {
                policy.replace(PolicySnapshot::from_config(&new_config));
                tracing::info!("Policy snapshot replaced");
            }
        });

        let (grace_tx, grace_rx) = oneshot::channel::<()>();
        let signal = async move {
            signals::shutdown_requested(shutdown).await;
            let _ = grace_tx.send(());
        };

        let app = self.router.into_make_service();
        let serve = axum::serve(listener, app).with_graceful_shutdown(signal);

        tokio::select! {
            result = serve.into_future() => result?,
            _ = grace_expired(grace_rx) => {
                tracing::warn!(
                    grace_secs = SHUTDOWN_GRACE.as_secs(),
                    "Shutdown grace period expired; aborting remaining connections"
                );
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Resolves once shutdown has begun and the grace period has elapsed.
async fn grace_expired(grace_rx: oneshot::Receiver<()>) {
    if grace_rx.await.is_ok() {
        tokio::time::sleep(SHUTDOWN_GRACE).await;
    } else {
        // Sender dropped without firing: the server ended on its own.
        std::future::pending::<()>().await;
    }
}
