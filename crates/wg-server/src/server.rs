// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Main server implementation

use crate::config::ServerConfig;
use crate::dependencies::DefaultServerDependencies;
use crate::error::{ServerError, ServerResult};
use crate::handlers::{self, upload::UPLOAD_BODY_LIMIT};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Wiki gateway server
pub struct Server {
    config: ServerConfig,
    state: AppState,
    app: Router,
}

impl Server {
    /// Create a server backed by the configuration files and wiki directory
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let state = DefaultServerDependencies::new(&config)?.into_state();
        Ok(Self::with_state(config, state))
    }

    /// Construct a server from an already-built app state
    pub fn with_state(config: ServerConfig, state: AppState) -> Self {
        let app = build_app(state.clone(), &config);
        Self { config, state, app }
    }

    /// The fully layered router, for driving requests without a socket
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Run the server
    pub async fn run(self) -> ServerResult<()> {
        let addr = self.config.bind_addr;
        info!("Starting server on {}", addr);

        #[cfg(unix)]
        spawn_reload_on_hangup(&self.state)?;

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, self.app)
            .await
            .map_err(|err| ServerError::Internal(format!("HTTP server error: {err}")))
    }
}

/// Build the Axum application with routes and middleware
pub fn build_app(state: AppState, config: &ServerConfig) -> Router {
    let cors = if config.enable_cors {
        CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
    } else {
        CorsLayer::new()
    };
    let middleware_stack = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors);

    Router::new()
        // Health and status endpoints
        .route("/healthz", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readiness_check))
        .route("/version", get(handlers::health::version))
        // Root wiki
        .route("/", get(handlers::wikis::root_wiki))
        .route("/favicon.ico", get(handlers::files::root_favicon))
        .route("/files/*path", get(handlers::files::root_file))
        // Mutations
        .route("/upload", post(handlers::upload::upload_file))
        .route("/api/wikis", post(handlers::tenants::create_wiki))
        // Tenant wikis
        .route("/:wiki", get(handlers::wikis::tenant_wiki))
        .route("/:wiki/favicon.ico", get(handlers::files::tenant_favicon))
        .route("/:wiki/files/*path", get(handlers::files::tenant_file))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
        .with_state(state)
        .layer(middleware_stack)
}

/// Re-read both configuration tiers whenever the process receives SIGHUP
#[cfg(unix)]
fn spawn_reload_on_hangup(state: &AppState) -> ServerResult<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangups = signal(SignalKind::hangup())?;
    let store = std::sync::Arc::clone(&state.config_store);
    tokio::spawn(async move {
        while hangups.recv().await.is_some() {
            info!("SIGHUP received, reloading configuration");
            let store = std::sync::Arc::clone(&store);
            if let Err(e) = tokio::task::spawn_blocking(move || store.reload()).await {
                tracing::error!(error = %e, "configuration reload did not complete");
            }
        }
    });
    Ok(())
}
