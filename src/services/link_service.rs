//! Link service
//!
//! Shortening, redirect resolution with click recording, statistics and the
//! admin listing. HTTP handlers are thin wrappers around these methods.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::errors::{LinkpingError, Result};
use crate::services::GeoIpProvider;
use crate::storage::{ClickEvent, SeaOrmStorage, ShortLink};
use crate::utils::{generate_short_code, is_valid_short_code};

/// Path prefix under which short codes resolve
pub const SHORT_URL_PATH: &str = "/api/url";

// ============ Response DTOs ============

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResult {
    pub original_url: String,
    pub short_url: String,
    pub short_code: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkStats {
    pub original_url: String,
    pub short_code: String,
    pub total_clicks: u64,
    pub logs: Vec<ClickEvent>,
}

/// 拼接短链接：`<base>/api/url/<code>`
pub fn build_short_url(base: &str, code: &str) -> String {
    format!("{}{}/{}", base.trim_end_matches('/'), SHORT_URL_PATH, code)
}

// ============ LinkService ============

pub struct LinkService {
    storage: Arc<SeaOrmStorage>,
    geoip: GeoIpProvider,
}

impl LinkService {
    pub fn new(storage: Arc<SeaOrmStorage>, geoip: GeoIpProvider) -> Self {
        Self { storage, geoip }
    }

    /// Create a short link for `original_url`.
    ///
    /// The URL itself is not validated; only a missing or blank value is
    /// rejected. Code uniqueness is left to the primary key.
    pub async fn shorten(&self, original_url: Option<&str>, base: &str) -> Result<ShortenResult> {
        let original_url = original_url
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| LinkpingError::invalid_request("Original URL is required"))?;

        let code = generate_short_code();
        let link = self.storage.insert_link(&code, original_url).await?;

        info!("LinkService: shortened {} -> {}", link.code, link.original_url);

        Ok(ShortenResult {
            short_url: build_short_url(base, &link.code),
            original_url: link.original_url,
            short_code: link.code,
        })
    }

    /// Resolve `code` to its destination, bump the counter and record a click.
    ///
    /// The increment and the log insert are separate writes; if the insert
    /// fails the counter stays incremented.
    pub async fn resolve_and_record(&self, code: &str, client_ip: Option<String>) -> Result<String> {
        if !is_valid_short_code(code) {
            return Err(LinkpingError::not_found("URL not found"));
        }

        let link = self
            .storage
            .get(code)
            .await?
            .ok_or_else(|| LinkpingError::not_found("URL not found"))?;

        if !self.storage.increment_clicks(code).await? {
            // 查询与更新之间被删除的情况，当前没有删除路径，仅记录
            warn!("LinkService: counter update matched no row for {}", code);
        }

        let location = match client_ip.as_deref() {
            Some(ip) => self.geoip.lookup(ip).await,
            None => None,
        };

        let event = ClickEvent {
            short_code: link.code.clone(),
            ip: client_ip,
            location,
            clicked_at: Utc::now(),
        };
        self.storage.insert_click(&event).await?;

        debug!(
            "LinkService: redirect {} -> {} (ip={:?})",
            code, link.original_url, event.ip
        );
        Ok(link.original_url)
    }

    pub async fn stats(&self, code: &str) -> Result<LinkStats> {
        if !is_valid_short_code(code) {
            return Err(LinkpingError::not_found("URL not found"));
        }

        let link = self
            .storage
            .get(code)
            .await?
            .ok_or_else(|| LinkpingError::not_found("URL not found"))?;
        let logs = self.storage.clicks_for(code).await?;

        Ok(LinkStats {
            original_url: link.original_url,
            short_code: link.code,
            total_clicks: link.clicks,
            logs,
        })
    }

    /// 管理员列表：全部短链接，最新在前
    pub async fn list_all(&self) -> Result<Vec<ShortLink>> {
        let links = self.storage.load_all_newest_first().await?;
        info!("LinkService: admin listing returned {} links", links.len());
        Ok(links)
    }
}
