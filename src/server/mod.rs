//! Local edge-proxy front for the interceptor.
//!
//! Stands in for the edge platform wiring: adapts a plain HTTP request into
//! the edge event shape, attaches the configured origin descriptor, and
//! relays the interceptor's response back to the client. Adds no rewrite
//! semantics of its own.

use crate::config::Config;
use crate::edge::event::{CustomOrigin, EdgeRequestContext, HeaderEntry, Origin};
use crate::edge::Interceptor;
use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    pub interceptor: Arc<Interceptor>,
    /// Origin descriptor attached to every intercepted request. Absence
    /// exercises the interceptor's "Origin not found" path.
    pub origin: Option<CustomOrigin>,
}

/// Create the Axum router
pub fn create_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_check))
        .fallback(intercept)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

/// Start the edge proxy server
pub async fn start_server(config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let origin = config.origin.as_ref().map(|origin| CustomOrigin {
        protocol: origin.protocol.clone(),
        domain_name: origin.domain_name.clone(),
        port: origin.port,
    });
    if origin.is_none() {
        tracing::warn!("no [origin] configured; all requests will return the soft-failure body");
    }

    let ctx = AppContext {
        interceptor: Arc::new(Interceptor::new(config.preroll.clone())),
        origin,
    };

    let app = create_router(ctx);

    tracing::info!("Starting edge proxy on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Lift an HTTP request into the edge event shape and relay the
/// interceptor's response.
async fn intercept(State(ctx): State<AppContext>, request: Request) -> Response {
    let (parts, _body) = request.into_parts();

    let mut headers: BTreeMap<String, Vec<HeaderEntry>> = BTreeMap::new();
    for (name, value) in &parts.headers {
        let Ok(value) = value.to_str() else {
            continue;
        };
        headers
            .entry(name.as_str().to_string())
            .or_default()
            .push(HeaderEntry::new(name.as_str(), value));
    }

    let event = EdgeRequestContext {
        uri: parts.uri.path().to_string(),
        querystring: parts.uri.query().unwrap_or("").to_string(),
        headers,
        origin: ctx.origin.clone().map(|custom| Origin {
            custom: Some(custom),
        }),
    };

    let edge_response = ctx.interceptor.handle(&event).await;

    let status = edge_response
        .status
        .parse::<u16>()
        .ok()
        .and_then(|code| StatusCode::from_u16(code).ok())
        .unwrap_or(StatusCode::OK);

    let mut builder = Response::builder().status(status);
    for entries in edge_response.headers.values() {
        for entry in entries {
            builder = builder.header(entry.key.as_str(), entry.value.as_str());
        }
    }
    builder
        .body(Body::from(edge_response.body))
        .unwrap_or_else(|err| {
            tracing::error!(error = %err, "failed to build relay response");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
