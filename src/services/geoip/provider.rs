//! GeoIP Provider 抽象层
//!
//! 统一的 GeoIP 查询接口，根据配置自动选择实现：
//! 1. enable_geo_lookup = false → 不查询
//! 2. maxminddb_path 配置且文件可读 → MaxMindProvider
//! 3. 否则 → ExternalApiProvider

use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::external_api::ExternalApiProvider;
use super::maxmind::MaxMindProvider;
use crate::config::AnalyticsConfig;
use crate::storage::GeoLocation;
use crate::utils::ip::{is_private_or_local, parse_client_ip};

/// GeoIP 查询 trait
///
/// Implementations never fail: anything that goes wrong is "no location".
#[async_trait]
pub trait GeoIpLookup: Send + Sync {
    async fn lookup(&self, ip: &str) -> Option<GeoLocation>;

    /// 获取 provider 名称（用于日志）
    fn name(&self) -> &'static str;
}

struct DisabledLookup;

#[async_trait]
impl GeoIpLookup for DisabledLookup {
    async fn lookup(&self, _ip: &str) -> Option<GeoLocation> {
        None
    }

    fn name(&self) -> &'static str {
        "Disabled"
    }
}

/// 统一 GeoIP Provider
#[derive(Clone)]
pub struct GeoIpProvider {
    inner: Arc<dyn GeoIpLookup>,
}

impl GeoIpProvider {
    /// 根据 AnalyticsConfig 初始化
    pub fn new(config: &AnalyticsConfig) -> Self {
        if !config.enable_geo_lookup {
            info!("GeoIP: lookup disabled by configuration");
            return Self::disabled();
        }

        let inner: Arc<dyn GeoIpLookup> = if let Some(ref path) = config.maxminddb_path {
            match MaxMindProvider::new(path) {
                Ok(provider) => {
                    info!("GeoIP: Using MaxMind database at {}", path);
                    Arc::new(provider)
                }
                Err(e) => {
                    warn!(
                        "GeoIP: Failed to load MaxMind database at {}: {}, falling back to external API",
                        path, e
                    );
                    Arc::new(ExternalApiProvider::new(&config.geoip_api_url))
                }
            }
        } else {
            debug!("GeoIP: No MaxMind database configured, using external API");
            Arc::new(ExternalApiProvider::new(&config.geoip_api_url))
        };

        info!("GeoIP: Initialized with {} provider", inner.name());
        Self { inner }
    }

    pub fn disabled() -> Self {
        Self {
            inner: Arc::new(DisabledLookup),
        }
    }

    /// 使用自定义实现（测试或嵌入场景）
    pub fn from_lookup(lookup: Arc<dyn GeoIpLookup>) -> Self {
        Self { inner: lookup }
    }

    /// 查询 IP 地址的地理位置
    ///
    /// Private, loopback and unparseable addresses are skipped without a lookup.
    /// A result with every field empty counts as no location.
    pub async fn lookup(&self, ip: &str) -> Option<GeoLocation> {
        let addr: IpAddr = parse_client_ip(ip)?;
        if is_private_or_local(&addr) {
            return None;
        }

        self.inner
            .lookup(&addr.to_string())
            .await
            .filter(|location| !location.is_empty())
    }

    /// 获取当前使用的 provider 名称
    pub fn provider_name(&self) -> &'static str {
        self.inner.name()
    }
}
