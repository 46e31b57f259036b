//! HTTP server facade for Marquee: Axum bootstrap, middleware assembly,
//! and the shared API error type.

use anyhow::Context;
use axum::{routing::get, Router};

use marquee_kernel::ModuleRegistry;

pub mod error;
pub mod router;

use router::RouterBuilder;

/// Start the HTTP server with the given module registry.
///
/// Binds `server.host:server.port` from settings and serves until the
/// process is terminated.
pub async fn start_server(
    registry: &ModuleRegistry,
    settings: &marquee_kernel::settings::Settings,
) -> anyhow::Result<()> {
    let app = build_router(registry, settings);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", settings.server.host, settings.server.port))
            .await
            .context("failed to bind to address")?;

    tracing::info!(
        "HTTP server listening on http://{}:{}",
        settings.server.host,
        settings.server.port
    );

    axum::serve(listener, app)
        .await
        .context("HTTP server failed")?;

    Ok(())
}

/// Build the main HTTP router with all module routes mounted.
pub fn build_router(
    registry: &ModuleRegistry,
    settings: &marquee_kernel::settings::Settings,
) -> Router {
    let mut router_builder = RouterBuilder::new().route("/healthz", get(health_check));

    for module in registry.modules() {
        tracing::info!(
            module = module.name(),
            "mounting module routes under /{}",
            module.name()
        );
        router_builder = router_builder.mount_module(module.name(), module.routes());
    }

    // Middleware wraps only the routes registered before it, so the stack
    // goes on after every route is mounted.
    router_builder
        .with_openapi(registry)
        .with_middleware(settings.server.request_timeout_ms)
        .build()
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}
