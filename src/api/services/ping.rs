use std::sync::Arc;

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use tracing::error;

use crate::errors::LinkpingError;
use crate::services::PingService;

#[derive(Debug, Deserialize)]
pub struct PingRequest {
    #[serde(default)]
    pub host: Option<String>,
}

pub struct PingCheckService;

impl PingCheckService {
    pub async fn check(
        body: web::Json<PingRequest>,
        ping: web::Data<Arc<PingService>>,
    ) -> Result<HttpResponse, LinkpingError> {
        let result = ping.check(body.host.as_deref()).await.inspect_err(|e| {
            if e.is_internal() {
                error!("ping failed: {}", e);
            }
        })?;

        Ok(HttpResponse::Ok().json(result))
    }
}

pub fn ping_routes() -> actix_web::Scope {
    web::scope("/api/ping")
        .route("", web::post().to(PingCheckService::check))
        .route("/", web::post().to(PingCheckService::check))
}
