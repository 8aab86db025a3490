//! `/api/url` routes: shorten, redirect, stats and the admin listing

use std::sync::Arc;

use actix_web::http::header;
use actix_web::middleware::from_fn;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, trace};

use crate::api::middleware::admin_token_guard;
use crate::config::StaticConfig;
use crate::errors::LinkpingError;
use crate::services::{LinkService, SHORT_URL_PATH};
use crate::utils::ip::extract_client_ip;

#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    #[serde(rename = "originalUrl", default)]
    pub original_url: Option<String>,
}

pub struct UrlService;

impl UrlService {
    pub async fn shorten(
        req: HttpRequest,
        body: web::Json<ShortenRequest>,
        links: web::Data<Arc<LinkService>>,
        config: web::Data<Arc<StaticConfig>>,
    ) -> Result<HttpResponse, LinkpingError> {
        let base = Self::public_base(&req, &config);

        let result = links
            .shorten(body.original_url.as_deref(), &base)
            .await
            .inspect_err(|e| log_internal("shorten", e))?;

        Ok(HttpResponse::Created().json(result))
    }

    pub async fn redirect(
        req: HttpRequest,
        path: web::Path<String>,
        links: web::Data<Arc<LinkService>>,
    ) -> Result<HttpResponse, LinkpingError> {
        let code = path.into_inner();
        let client_ip = extract_client_ip(&req);

        let target = links
            .resolve_and_record(&code, client_ip)
            .await
            .inspect_err(|e| log_internal("redirect", e))?;

        trace!("Redirecting {} -> {}", code, target);
        Ok(HttpResponse::Found()
            .insert_header((header::LOCATION, target))
            .finish())
    }

    pub async fn stats(
        path: web::Path<String>,
        links: web::Data<Arc<LinkService>>,
    ) -> Result<HttpResponse, LinkpingError> {
        let stats = links
            .stats(&path.into_inner())
            .await
            .inspect_err(|e| log_internal("stats", e))?;

        Ok(HttpResponse::Ok().json(stats))
    }

    pub async fn list_all(
        links: web::Data<Arc<LinkService>>,
    ) -> Result<HttpResponse, LinkpingError> {
        let urls = links
            .list_all()
            .await
            .inspect_err(|e| log_internal("admin listing", e))?;

        Ok(HttpResponse::Ok().json(json!({ "urls": urls })))
    }

    /// Configured public base, else the scheme and host the request came in on.
    fn public_base(req: &HttpRequest, config: &StaticConfig) -> String {
        match config.server.public_base_url.as_deref() {
            Some(base) if !base.trim().is_empty() => base.trim().to_string(),
            _ => {
                let info = req.connection_info();
                format!("{}://{}", info.scheme(), info.host())
            }
        }
    }
}

fn log_internal(operation: &str, err: &LinkpingError) {
    if err.is_internal() {
        error!("{} failed: {}", operation, err);
    }
}

/// 路由注册顺序：固定前缀的两段路径在 `/{code}` 之前
pub fn url_routes() -> actix_web::Scope {
    web::scope(SHORT_URL_PATH)
        .route("/shorten", web::post().to(UrlService::shorten))
        .route("/stats/{code}", web::get().to(UrlService::stats))
        .service(
            web::resource("/admin/all")
                .wrap(from_fn(admin_token_guard))
                .route(web::get().to(UrlService::list_all)),
        )
        .route("/{code}", web::get().to(UrlService::redirect))
}
