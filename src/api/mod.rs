//! HTTP layer: route registration, request extractors and middleware

pub mod middleware;
pub mod services;

use actix_web::web;
use tracing::debug;

use crate::errors::LinkpingError;

/// JSON 请求体大小上限
const JSON_BODY_LIMIT: usize = 64 * 1024;

/// Malformed or non-JSON bodies become a 400 with the usual error body.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(|err, _req| {
            debug!("Rejected request body: {}", err);
            LinkpingError::invalid_request("Invalid JSON body").into()
        })
}

/// Registers every route. Shared by the server and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(services::url_routes())
        .service(services::ping_routes())
        .service(services::frontend_routes());
}
