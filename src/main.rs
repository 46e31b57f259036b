use anyhow::Context;
use marquee_app::modules;
use marquee_kernel::settings::Settings;
use marquee_kernel::{InitCtx, ModuleRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load Marquee settings")?;

    marquee_telemetry::init(&settings.telemetry);

    tracing::info!(
        env = ?settings.environment,
        port = settings.server.port,
        "marquee bootstrap starting"
    );

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry);

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    tracing::info!("marquee bootstrap complete");

    marquee_http::start_server(&registry, &settings).await?;

    registry.stop_all().await?;

    Ok(())
}
