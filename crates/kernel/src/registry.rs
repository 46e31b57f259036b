use anyhow::Context;
use std::sync::Arc;

use crate::module::{InitCtx, Module};

/// Module registry holding every registered module in registration order.
///
/// Initialization and startup run in registration order; shutdown runs in
/// reverse so later modules stop before the ones they may depend on.
pub struct ModuleRegistry {
    modules: Vec<Arc<dyn Module>>,
}

impl ModuleRegistry {
    /// Create a new, empty module registry.
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
        }
    }

    /// Register a module with the registry.
    pub fn register(&mut self, module: Arc<dyn Module>) {
        self.modules.push(module);
    }

    /// Get all registered modules in registration order.
    pub fn modules(&self) -> &[Arc<dyn Module>] {
        &self.modules
    }

    /// Get a module by name.
    pub fn get_module(&self, name: &str) -> Option<&Arc<dyn Module>> {
        self.modules.iter().find(|module| module.name() == name)
    }

    /// Number of registered modules.
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Initialize all modules in registration order.
    pub async fn init_all(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!("initializing {} modules", self.modules.len());

        for module in &self.modules {
            tracing::info!(module = module.name(), "initializing module");

            module
                .init(ctx)
                .await
                .with_context(|| format!("failed to initialize module '{}'", module.name()))?;
        }

        Ok(())
    }

    /// Start all modules in registration order.
    pub async fn start_all(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!("starting {} modules", self.modules.len());

        for module in &self.modules {
            tracing::info!(module = module.name(), "starting module");

            module
                .start(ctx)
                .await
                .with_context(|| format!("failed to start module '{}'", module.name()))?;
        }

        Ok(())
    }

    /// Stop all modules in reverse registration order.
    pub async fn stop_all(&self) -> anyhow::Result<()> {
        tracing::info!("stopping {} modules", self.modules.len());

        for module in self.modules.iter().rev() {
            tracing::info!(module = module.name(), "stopping module");

            module
                .stop()
                .await
                .with_context(|| format!("failed to stop module '{}'", module.name()))?;
        }

        Ok(())
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
