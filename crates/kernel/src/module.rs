use async_trait::async_trait;
use axum::Router;

/// Context provided to modules during initialization and startup.
pub struct InitCtx<'a> {
    pub settings: &'a crate::settings::Settings,
}

/// Lifecycle trait implemented by every Marquee module.
///
/// A module owns its own state; the router returned by [`Module::routes`]
/// must already have that state applied.
#[async_trait]
pub trait Module: Sync + Send {
    /// Unique name for this module; its routes are mounted under `/{name}`.
    fn name(&self) -> &'static str;

    /// Initialize the module with the provided context.
    /// Called during application startup, before any route is served.
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Return the Axum router for this module's routes.
    fn routes(&self) -> Router {
        Router::new()
    }

    /// Return an OpenAPI specification fragment for this module as JSON.
    /// Fragments from all modules are merged into the served document.
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    /// Start background work for this module, after every module is
    /// initialized.
    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Stop the module and release resources. Called during shutdown.
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
