//! Metrics Server
//!
//! Serves the exporter's registry in the Prometheus text format, plus
//! liveness and readiness probes, over plain HTTP.

use crate::error::{Error, Result};
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Method, Request, Response, Server, StatusCode};
use prometheus::{Encoder, Registry, TextEncoder};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Readiness check evaluated on every `/readyz` request
pub type ReadinessCheck = Arc<dyn Fn() -> bool + Send + Sync>;

// =============================================================================
// Server Configuration
// =============================================================================

/// Configuration for the metrics server
#[derive(Debug, Clone)]
pub struct MetricsServerConfig {
    /// Bind address
    pub addr: SocketAddr,
}

impl Default for MetricsServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
        }
    }
}

// =============================================================================
// Metrics Server
// =============================================================================

/// HTTP server exposing a prometheus registry
pub struct MetricsServer {
    config: MetricsServerConfig,
    registry: Registry,
    readiness: ReadinessCheck,
}

impl MetricsServer {
    /// Create a server that always reports ready
    pub fn new(config: MetricsServerConfig, registry: Registry) -> Self {
        Self {
            config,
            registry,
            readiness: Arc::new(|| true),
        }
    }

    /// Gate `/readyz` on a check
    pub fn with_readiness(mut self, readiness: ReadinessCheck) -> Self {
        self.readiness = readiness;
        self
    }

    /// Serve until `shutdown` is cancelled
    pub async fn run(self, shutdown: CancellationToken) -> Result<()> {
        let MetricsServer {
            config,
            registry,
            readiness,
        } = self;

        let make_svc = make_service_fn(move |_conn| {
            let registry = registry.clone();
            let readiness = readiness.clone();
            async move {
                Ok::<_, Infallible>(service_fn(move |req: Request<Body>| {
                    let response = route(&req, &registry, &readiness);
                    async move { Ok::<_, Infallible>(response) }
                }))
            }
        });

        let server = Server::try_bind(&config.addr)
            .map_err(|e| Error::Internal(format!("Failed to bind metrics server: {}", e)))?;

        info!("Metrics server listening on {}", config.addr);
        server
            .serve(make_svc)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                info!("Metrics server shutting down");
            })
            .await
            .map_err(|e| Error::Internal(format!("Metrics server error: {}", e)))?;

        Ok(())
    }
}

/// Encode every family gathered from `registry` in the text format
pub fn render(registry: &Registry) -> Result<Vec<u8>> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&registry.gather(), &mut buffer)?;
    Ok(buffer)
}

fn route(req: &Request<Body>, registry: &Registry, readiness: &ReadinessCheck) -> Response<Body> {
    if req.method() != Method::GET && req.method() != Method::HEAD {
        return respond(StatusCode::METHOD_NOT_ALLOWED, "text/plain", "method not allowed");
    }

    match req.uri().path() {
        "/metrics" => match render(registry) {
            Ok(buffer) => respond(StatusCode::OK, prometheus::TEXT_FORMAT, buffer),
            Err(e) => {
                error!(error = %e, "Failed to encode metrics");
                respond(StatusCode::INTERNAL_SERVER_ERROR, "text/plain", "failed to encode metrics")
            }
        },
        "/healthz" | "/livez" => respond(StatusCode::OK, "text/plain", "ok"),
        "/readyz" => {
            if readiness() {
                respond(StatusCode::OK, "text/plain", "ok")
            } else {
                respond(StatusCode::SERVICE_UNAVAILABLE, "text/plain", "caches not synced")
            }
        }
        _ => respond(StatusCode::NOT_FOUND, "text/plain", "not found"),
    }
}

fn respond(status: StatusCode, content_type: &'static str, body: impl Into<Body>) -> Response<Body> {
    let mut response = Response::new(body.into());
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}
