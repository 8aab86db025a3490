use actix_web::{HttpResponse, Result, web};
use rust_embed::Embed;
use tracing::{trace, warn};

// 编译期嵌入前端页面
#[derive(Embed)]
#[folder = "web/"]
struct WebAssets;

pub struct FrontendService;

impl FrontendService {
    /// 首页：表单 + 表格的单页
    pub async fn handle_index() -> Result<HttpResponse> {
        trace!("Serving embedded index page");

        match WebAssets::get("index.html") {
            Some(content) => {
                let html = String::from_utf8_lossy(&content.data)
                    .replace("%LINKPING_VERSION%", env!("CARGO_PKG_VERSION"));

                Ok(HttpResponse::Ok()
                    .content_type("text/html; charset=utf-8")
                    .body(html))
            }
            None => {
                warn!("Embedded index.html is missing");
                Ok(HttpResponse::NotFound()
                    .content_type("text/plain; charset=utf-8")
                    .body("Not Found"))
            }
        }
    }
}

pub fn frontend_routes() -> actix_web::Resource {
    web::resource("/").route(web::get().to(FrontendService::handle_index))
}
