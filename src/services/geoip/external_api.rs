//! 外部 GeoIP API 实现
//!
//! 使用外部 HTTP API 进行 IP 地理位置查询（如 ip-api.com）
//! 内置缓存 + Singleflight 语义，避免重复查询

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::{trace, warn};
use ureq::Agent;

use super::provider::GeoIpLookup;
use crate::storage::GeoLocation;

/// GeoIP 缓存 TTL（15 分钟）
const GEOIP_CACHE_TTL_SECS: u64 = 15 * 60;
/// GeoIP 缓存最大容量
const GEOIP_CACHE_MAX_CAPACITY: u64 = 10_000;
/// HTTP 请求超时时间
const HTTP_TIMEOUT_SECS: u64 = 2;

static HTTP_AGENT: OnceLock<Agent> = OnceLock::new();

fn get_agent() -> &'static Agent {
    HTTP_AGENT.get_or_init(|| {
        Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(HTTP_TIMEOUT_SECS)))
            .build()
            .into()
    })
}

/// 外部 API GeoIP Provider
///
/// 内置 Moka 缓存：
/// - 最大 10000 条，TTL 15 分钟
/// - 同一 IP 的并发请求只发一次 HTTP
pub struct ExternalApiProvider {
    api_url_template: String,
    /// IP → GeoLocation 缓存（None 用于负缓存）
    cache: Cache<String, Option<GeoLocation>>,
}

impl ExternalApiProvider {
    /// `api_url_template` 使用 `{ip}` 作为占位符
    pub fn new(api_url_template: &str) -> Self {
        let cache = Cache::builder()
            .time_to_live(Duration::from_secs(GEOIP_CACHE_TTL_SECS))
            .max_capacity(GEOIP_CACHE_MAX_CAPACITY)
            .build();

        Self {
            api_url_template: api_url_template.to_string(),
            cache,
        }
    }

    /// 解析 API 响应
    ///
    /// ip-api.com: `{"status":"success","countryCode":"US","regionName":"California","city":"Mountain View"}`,
    /// 失败时 `{"status":"fail",...}`。也接受其他服务常见的字段名。
    pub(crate) fn parse_response(json: &serde_json::Value) -> Option<GeoLocation> {
        if json["status"].as_str() == Some("fail") {
            trace!("External API returned fail status");
            return None;
        }

        let text = |keys: &[&str]| {
            keys.iter()
                .find_map(|k| json[*k].as_str())
                .filter(|s| !s.is_empty())
                .map(String::from)
        };

        let location = GeoLocation {
            city: text(&["city"]),
            region: text(&["regionName", "region_name", "region"]),
            country: text(&["countryCode", "country_code", "country"]),
        };

        (!location.is_empty()).then_some(location)
    }

    /// 同步请求，在 spawn_blocking 中调用
    fn fetch_from_api_sync(url: String) -> Option<GeoLocation> {
        let agent = get_agent();

        let resp = match agent.get(&url).call() {
            Ok(r) => r,
            Err(e) => {
                warn!("GeoIP API request to \"{}\" failed: {}", url, e);
                return None;
            }
        };

        let json: serde_json::Value = match resp.into_body().read_json() {
            Ok(j) => j,
            Err(e) => {
                warn!("GeoIP API response from \"{}\" parse failed: {}", url, e);
                return None;
            }
        };

        Self::parse_response(&json)
    }

    async fn fetch_from_api(&self, ip: &str) -> Option<GeoLocation> {
        let url = self.api_url_template.replace("{ip}", ip);

        tokio::task::spawn_blocking(move || Self::fetch_from_api_sync(url))
            .await
            .unwrap_or_else(|e| {
                warn!("GeoIP spawn_blocking failed: {}", e);
                None
            })
    }
}

#[async_trait]
impl GeoIpLookup for ExternalApiProvider {
    async fn lookup(&self, ip: &str) -> Option<GeoLocation> {
        // get_with 自带 singleflight 语义
        self.cache
            .get_with(ip.to_string(), async {
                trace!("GeoIP cache miss for {}, fetching from API", ip);
                self.fetch_from_api(ip).await
            })
            .await
    }

    fn name(&self) -> &'static str {
        "ExternalAPI"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_ip_api_success() {
        let location = ExternalApiProvider::parse_response(&json!({
            "status": "success",
            "countryCode": "US",
            "regionName": "Virginia",
            "city": "Ashburn"
        }))
        .unwrap();

        assert_eq!(location.country.as_deref(), Some("US"));
        assert_eq!(location.region.as_deref(), Some("Virginia"));
        assert_eq!(location.city.as_deref(), Some("Ashburn"));
    }

    #[test]
    fn test_parse_fail_status() {
        let result = ExternalApiProvider::parse_response(&json!({
            "status": "fail",
            "message": "private range"
        }));
        assert!(result.is_none());
    }

    #[test]
    fn test_parse_alternative_field_names() {
        let location = ExternalApiProvider::parse_response(&json!({
            "country_code": "DE",
            "region": "Berlin",
            "city": ""
        }))
        .unwrap();

        assert_eq!(location.country.as_deref(), Some("DE"));
        assert_eq!(location.region.as_deref(), Some("Berlin"));
        assert!(location.city.is_none());
    }

    #[test]
    fn test_parse_empty_object_is_none() {
        assert!(ExternalApiProvider::parse_response(&json!({})).is_none());
    }

    /// 依赖外部网络服务，CI 环境可能失败
    #[tokio::test]
    #[ignore]
    async fn test_external_api_provider_lookup() {
        let provider = ExternalApiProvider::new(
            "http://ip-api.com/json/{ip}?fields=status,countryCode,regionName,city",
        );

        let first = provider.lookup("8.8.8.8").await;
        assert_eq!(first.as_ref().and_then(|l| l.country.as_deref()), Some("US"));

        // 第二次命中缓存
        let second = provider.lookup("8.8.8.8").await;
        assert_eq!(first, second);
    }

    /// TEST-NET 地址不可路由，应在超时内返回 None
    #[test]
    #[ignore]
    fn test_timeout_handling() {
        let result = ExternalApiProvider::fetch_from_api_sync("http://192.0.2.1/timeout-test".to_string());
        assert!(result.is_none());
    }
}
