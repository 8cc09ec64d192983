use actix_cors::Cors;
use actix_web::{http::header, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mei_ledger::app::{configure_probes, AppServices};
use mei_ledger::config::{Config, DatabaseConfig, LogFormat};
use mei_ledger::middleware::RequestId;

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "mei_ledger=debug,actix_web=info".into());

    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

fn cors(allowed_origin: Option<&str>) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600);

    match allowed_origin {
        Some(origin) => cors.allowed_origin(origin),
        None => cors,
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;

    init_tracing(config.app.log_format);

    tracing::info!("Starting MEI Ledger");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!(
        rate = %config.tax.rate,
        min_amount = %config.tax.min_amount,
        due_day = config.tax.due_day,
        "Tax engine configured"
    );

    // Create database connection pool
    let db_pool = config
        .database
        .create_pool()
        .await
        .context("Failed to create database pool")?;

    DatabaseConfig::run_migrations(&db_pool)
        .await
        .context("Failed to run migrations")?;

    tracing::info!(
        "Database pool initialized ({} connections)",
        config.database.pool_size
    );

    let services = AppServices::mysql(&db_pool, &config);
    let allowed_origin = config.app.cors_allowed_origin.clone();

    // Start HTTP server
    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(cors(allowed_origin.as_deref()))
            .wrap(TracingLogger::default())
            .wrap(RequestId)
            .configure(|cfg| configure_probes(cfg, &db_pool))
            .configure(|cfg| services.configure(cfg))
    })
    .workers(config.server.workers)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await.context("Server terminated with an error")
}
