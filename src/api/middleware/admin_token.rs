use std::sync::Arc;

use actix_web::middleware::Next;
use actix_web::{
    Error, ResponseError,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web,
};
use subtle::ConstantTimeEq;
use tracing::{debug, info, warn};

use crate::config::StaticConfig;
use crate::errors::LinkpingError;

pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// 常量时间比较；未配置 token 时一律拒绝
pub fn verify_admin_token(configured: &str, supplied: Option<&[u8]>) -> bool {
    if configured.is_empty() {
        return false;
    }
    match supplied {
        Some(supplied) => bool::from(configured.as_bytes().ct_eq(supplied)),
        None => false,
    }
}

/// 管理员接口守卫，用于 `from_fn`
pub async fn admin_token_guard(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let configured = match req.app_data::<web::Data<Arc<StaticConfig>>>() {
        Some(config) => config.admin.token.clone(),
        None => {
            warn!("Admin guard: configuration missing from app data, denying request");
            String::new()
        }
    };

    let supplied = req
        .headers()
        .get(ADMIN_TOKEN_HEADER)
        .map(|value| value.as_bytes());

    if verify_admin_token(&configured, supplied) {
        debug!("Admin token accepted");
        return next.call(req).await;
    }

    if configured.is_empty() {
        info!("Admin listing requested but no admin token is configured");
    } else {
        info!("Admin authentication failed: token mismatch or missing header");
    }

    let response = LinkpingError::forbidden("Forbidden: Admins only").error_response();
    Ok(req.into_response(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_admin_token() {
        assert!(verify_admin_token("s3cret", Some(b"s3cret")));
        assert!(!verify_admin_token("s3cret", Some(b"s3cre")));
        assert!(!verify_admin_token("s3cret", Some(b"s3cret ")));
        assert!(!verify_admin_token("s3cret", Some(b"")));
        assert!(!verify_admin_token("s3cret", None));
    }

    #[test]
    fn test_empty_configured_token_never_matches() {
        assert!(!verify_admin_token("", Some(b"")));
        assert!(!verify_admin_token("", None));
        assert!(!verify_admin_token("", Some(b"anything")));
    }
}
