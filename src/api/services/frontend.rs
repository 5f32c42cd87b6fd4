use actix_web::{HttpRequest, HttpResponse};
use rust_embed::Embed;
use tracing::{debug, trace};

use crate::errors::ChatcasterError;

use super::helpers::error_response;

// 使用 RustEmbed 自动嵌入静态文件
#[derive(Embed)]
#[folder = "public/"]
struct FrontendAssets;

/// GET / - 服务 index.html
pub async fn handle_index() -> HttpResponse {
    trace!("Serving frontend index page");
    serve_asset("index.html")
}

/// GET /{path} - 处理静态资源文件
pub async fn handle_static(req: HttpRequest) -> HttpResponse {
    let path = req.match_info().query("path");
    trace!("Serving static file: {}", path);
    serve_asset(path)
}

fn serve_asset(path: &str) -> HttpResponse {
    match FrontendAssets::get(path) {
        Some(content) => HttpResponse::Ok()
            .content_type(get_content_type(path))
            .body(content.data.into_owned()),
        None => {
            debug!("Static file not found: {}", path);
            error_response(&ChatcasterError::not_found(format!(
                "File not found: {}",
                path
            )))
        }
    }
}

/// 根据文件扩展名确定 Content-Type
fn get_content_type(path: &str) -> &'static str {
    match path.rsplit('.').next().unwrap_or_default() {
        "html" => "text/html; charset=utf-8",
        "js" => "application/javascript; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "json" => "application/json",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}
