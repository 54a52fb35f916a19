mod app_config;
mod controllers;
mod repositories;
mod services;

use anyhow::{anyhow, Error as AnyError};
use axum::Router;
use shine_infra::web::{middlewares::PoweredBy, ProblemConfig, WebAppConfig};
use std::{env, net::SocketAddr};
use tokio::{net::TcpListener, runtime::Runtime, signal};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use self::{
    app_config::{AppConfig, SERVICE_NAME},
    controllers::{fallback, select::SelectProvider},
    repositories::tenant::StaticTenantResolver,
    services::{TeraRenderer, ViewRenderer, TEMPLATES_GLOB},
};

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => log::warn!("Received ctrl-c, shutting down the server..."),
            Err(err) => {
                log::error!("Failed to listen for ctrl-c: {err}");
                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                log::warn!("Received SIGTERM, shutting down the server...")
            }
            Err(err) => {
                log::error!("Failed to install SIGTERM handler: {err}");
                std::future::pending::<()>().await
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

fn init_logging() -> Result<(), AnyError> {
    tracing_log::LogTracer::init()?;
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

async fn async_main() -> Result<(), AnyError> {
    let args: Vec<String> = env::args().collect();
    let stage = args.get(1).ok_or(anyhow!("Missing config stage parameter"))?.clone();

    init_logging()?;

    let config = WebAppConfig::<AppConfig>::load(&stage, None)?;
    let problem_config = ProblemConfig::new(config.service.full_problem_response);

    log::trace!("Creating services...");
    let renderer = TeraRenderer::from_glob(TEMPLATES_GLOB)?;
    let select_template = &config.feature.select.select_template;
    if !renderer.has_template(select_template) {
        return Err(anyhow!("Missing select template {select_template} in {TEMPLATES_GLOB}"));
    }
    let tenant_resolver = StaticTenantResolver::new(&config.feature)?;

    let select_layer = SelectProvider::new(&config.feature.select, tenant_resolver, renderer, problem_config.clone())?;
    let powered_by_layer = PoweredBy::from_service_info(SERVICE_NAME, &config.core.version)?;
    let log_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let app = Router::new()
        .fallback(fallback::not_found)
        .layer(select_layer)
        .layer(problem_config.into_layer())
        .layer(powered_by_layer)
        .layer(log_layer);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.service.port));
    log::info!("Starting service on http://{addr:?}");
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow!(e))
}

pub fn main() {
    let rt = match Runtime::new() {
        Ok(rt) => rt,
        Err(err) => {
            eprintln!("[ERROR] Failed to create runtime: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = rt.block_on(async_main()) {
        eprintln!("[ERROR] {}", err);
        let mut cause = err.source();
        if cause.is_some() {
            eprintln!();
            eprintln!("Caused by:");
            let mut i = 0;
            while let Some(e) = cause {
                eprintln!("   {}: {}", i, e);
                cause = e.source();
                i += 1;
            }
        }
        std::process::exit(1);
    }
}
