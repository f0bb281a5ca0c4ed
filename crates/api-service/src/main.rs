//! 测试数据生成 REST 服务入口

use std::net::SocketAddr;
use std::sync::Arc;

use datagen_api_service::{
    auth::JwtConfig, payment::PayPalGateway, routes::build_app, state::AppState,
};
use datagen_shared::{config::AppConfig, database::Database, observability};
use tokio::net::TcpListener;
use tracing::{info, warn};

const SERVICE_NAME: &str = "datagen-api-service";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load(SERVICE_NAME)?;
    let _guard = observability::init(&config.service_name, &config.observability).await?;

    info!(
        environment = %config.environment,
        addr = %config.server_addr(),
        "Starting {}", SERVICE_NAME
    );

    let db = Database::connect(&config.database).await?;
    db.run_migrations().await?;

    let gateway = PayPalGateway::new(config.payment.clone())?;
    if !gateway.is_configured() {
        warn!("PayPal credentials missing, payment endpoints will return PAYMENT_NOT_CONFIGURED");
    }

    if config.allows_any_origin() {
        if config.is_production() {
            warn!("CORS allows any origin in production, set DATAGEN_CORS_ORIGINS");
        }
        info!("CORS allowed_origins: * (all origins)");
    } else {
        info!(origins = ?config.cors_origins, "CORS allowed_origins configured");
    }

    let state = AppState::new(
        db.clone(),
        JwtConfig::from(&config.auth),
        Arc::new(gateway),
        config.server.rate_limit.clone(),
    );
    let app = build_app(state, &config.cors_origins, config.server.body_limit_bytes);

    let listener = TcpListener::bind(config.server_addr()).await?;
    info!("Listening on {}", config.server_addr());

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");

    Ok(())
}

/// 监听 Ctrl+C 或 SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown..."),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown..."),
    }
}
