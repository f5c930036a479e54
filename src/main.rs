use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::{DefaultHeaders, NormalizePath}, web, App, HttpServer};
use anyhow::Context;
use contact_form_backend::{
    background_task::start_eviction_task,
    graceful_shutdown::shutdown_signal,
    mail::smtp::SmtpMailSender,
    routes::configure_routes,
    settings::AppConfig,
    templates::store::FsTemplateStore,
    AppState,
};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn cors(origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST"])
        .allow_any_header()
        .max_age(3600);

    if origins.iter().any(|o| o == "*") {
        return cors.allow_any_origin();
    }
    origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}

fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("X-Content-Type-Options", "nosniff"))
        .add(("X-Frame-Options", "DENY"))
        .add(("Referrer-Policy", "no-referrer"))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let loaded = AppConfig::new();
    init_tracing(matches!(&loaded, Ok(cfg) if cfg.is_production()));

    let config = match loaded {
        Ok(cfg) => {
            tracing::info!("Loaded configuration: {:?}", cfg);
            cfg
        },
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let sender = SmtpMailSender::from_config(&config)
        .map_err(|e| anyhow::anyhow!("{e}"))
        .context("Failed to set up SMTP transport")?;

    match sender.test_connection().await {
        Ok(true) => tracing::info!("SMTP relay {} reachable", config.smtp_relay),
        Ok(false) => tracing::warn!("SMTP relay {} refused the test connection", config.smtp_relay),
        Err(e) => tracing::warn!("SMTP relay check failed: {}", e),
    }

    let templates = FsTemplateStore::from_config(config.template_dir.as_deref());

    let app_state = web::Data::new(
        AppState::new(&config, Arc::new(sender), Arc::new(templates))
    );

    let server_addr = format!("{}:{}", config.host, config.port);

    tracing::info!(
        "🚀 Starting {} v{} on {}",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr
    );

    let limiter = app_state.limiter().clone();
    let origins = config.cors_origins();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(NormalizePath::trim())
            .wrap(security_headers())
            .wrap(cors(&origins))
            .wrap(TracingLogger::default())
            .configure(configure_routes)
    })
    .workers(config.worker_count)
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {server_addr}"))?
    .run();

    tokio::spawn(start_eviction_task(limiter, config.sweep_interval()));

    tokio::select! {
        res = server => res.context("HTTP server error")?,
        _ = shutdown_signal() => {},
    }

    Ok(())
}
