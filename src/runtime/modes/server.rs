//! Server mode
//!
//! Configures and starts the HTTP server with all routes.

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{
    App, HttpServer,
    http::{Method, header},
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::{Context, Result};
use tracing::warn;

use crate::api;
use crate::api::middleware::{ADMIN_TOKEN_HEADER, RequestLogMiddleware};
use crate::config::{CorsConfig, StaticConfig};
use crate::runtime::lifetime;

const CORS_MAX_AGE_SECS: usize = 3600;

/// Validate CORS configuration at startup (runs once)
fn validate_cors_config(cors_config: &CorsConfig) {
    if cors_config.allowed_origins.is_empty() {
        warn!(
            "CORS allowed_origins is empty. \
            No cross-origin requests will be allowed. \
            Set allowed_origins explicitly or use '[\"*\"]' for any origin."
        );
    } else if cors_config.allowed_origins.iter().any(|o| o == "*") {
        warn!("CORS allows any origin");
    }
}

/// Build CORS middleware from configuration
pub fn build_cors_middleware(cors_config: &CorsConfig) -> Cors {
    let mut cors = Cors::default();

    let is_any_origin = cors_config.allowed_origins.iter().any(|o| o == "*");
    if cors_config.allowed_origins.is_empty() {
        // Empty origins = same-origin only
    } else if is_any_origin {
        cors = cors.allow_any_origin();
    } else {
        for origin in &cors_config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors.allowed_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allowed_header(header::CONTENT_TYPE)
        .allowed_header(ADMIN_TOKEN_HEADER)
        .max_age(CORS_MAX_AGE_SECS)
}

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: Arc<StaticConfig>) -> Result<()> {
    let startup = lifetime::startup::prepare_server_startup(&config)
        .await
        .inspect_err(|e| tracing::error!("Server startup failed: {:#}", e))?;

    let storage = startup.storage.clone();
    let link_service = startup.link_service.clone();
    let ping_service = startup.ping_service.clone();

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    validate_cors_config(&config.cors);

    let app_config = config.clone();
    let server = HttpServer::new(move || {
        let cors = build_cors_middleware(&app_config.cors);

        App::new()
            .wrap(RequestLogMiddleware) // 最外层，记录请求延迟
            .wrap(cors)
            .wrap(Compress::default())
            .wrap(DefaultHeaders::new().add(("Cache-Control", "no-cache, no-store, must-revalidate")))
            .app_data(web::Data::new(link_service.clone()))
            .app_data(web::Data::new(ping_service.clone()))
            .app_data(web::Data::new(app_config.clone()))
            .configure(api::configure)
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .workers(cpu_count);

    let bind_address = config.bind_address();
    warn!("Starting server at http://{}", bind_address);
    let server = server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run();

    // Wait for server or shutdown signal
    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown(&storage) => {
            warn!("Graceful shutdown: all tasks completed");
        }
    }

    Ok(())
}
