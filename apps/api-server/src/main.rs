//! Quill API server entry point.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

use quill_api::config::AppConfig;
use quill_api::handlers;
use quill_api::state::AppState;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let config = AppConfig::from_env();

    tracing::info!("Starting Quill API on {}:{}", config.host, config.port);

    let state = AppState::from_env().await?;

    if let Some(admin) = &config.admin {
        state
            .seed_admin(&admin.name, &admin.email, &admin.password)
            .await;
    } else {
        tracing::warn!("ADMIN_EMAIL/ADMIN_PASSWORD not set. No administrator account seeded.");
    }

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,quill_api=debug,quill_infra=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().pretty())
        .init();
}
