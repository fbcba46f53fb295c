use std::sync::Arc;

use anyhow::Context;
use malaeb_app::{modules, Session};
use malaeb_kernel::{settings::Settings, InitCtx, ModuleRegistry, SystemClock, UuidIds};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load Malaeb settings")?;
    malaeb_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        seed_fixtures = settings.session.seed_fixtures,
        "malaeb-app bootstrap starting"
    );

    let session = Arc::new(Session::from_settings(
        Arc::new(SystemClock),
        Arc::new(UuidIds),
        &settings.session,
    ));

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, session);

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    tracing::info!(modules = registry.module_count(), "malaeb-app bootstrap complete");

    let served = malaeb_http::start_server(&registry, &settings, shutdown_signal()).await;
    registry.stop_modules().await?;
    served
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
