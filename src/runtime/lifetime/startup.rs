use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::config::StaticConfig;
use crate::services::{GeoIpProvider, LinkService, PingService};
use crate::storage::{SeaOrmStorage, StorageFactory};

pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub link_service: Arc<LinkService>,
    pub ping_service: Arc<PingService>,
}

/// 准备服务器启动的上下文：存储、GeoIP、服务
pub async fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let storage = StorageFactory::create(&config.database)
        .await
        .context("Failed to create storage backend")?;
    info!(
        "Using storage backend: {}",
        storage.get_backend_config().storage_type
    );

    let geoip = GeoIpProvider::new(&config.analytics);
    let link_service = Arc::new(LinkService::new(storage.clone(), geoip));
    let ping_service = Arc::new(PingService::system());

    check_component_enabled(config);

    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext {
        storage,
        link_service,
        ping_service,
    })
}

fn check_component_enabled(config: &StaticConfig) {
    let admin_token = &config.admin.token;
    if admin_token.is_empty() {
        info!("Admin listing is disabled (admin.token not set)");
    } else {
        if admin_token.len() < 8 {
            warn!("WARNING: Admin Token is very short. Consider using a stronger token.");
        }
        info!("Admin listing available at: /api/url/admin/all");
    }

    match config.server.public_base_url.as_deref() {
        Some(base) if !base.trim().is_empty() => info!("Short URLs use base: {}", base),
        _ => debug!("Short URLs use the request host as base"),
    }
}
