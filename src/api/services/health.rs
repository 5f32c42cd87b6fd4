use std::sync::Arc;

use actix_web::{HttpResponse, web};
use tracing::trace;

use crate::session::SessionManager;

use super::helpers::success_response;
use super::types::HealthResponse;

// 应用启动时间结构体
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// Name of the messenger backend, shown by /health
#[derive(Clone, Debug)]
pub struct MessengerBackendName(pub String);

/// GET /health
pub async fn health_check(
    sessions: web::Data<Arc<SessionManager>>,
    app_start_time: web::Data<AppStartTime>,
    backend: web::Data<MessengerBackendName>,
) -> HttpResponse {
    trace!("Received health check request");

    let now = chrono::Utc::now();
    let uptime = (now - app_start_time.start_datetime).num_seconds().max(0) as u64;

    success_response(HealthResponse {
        status: "healthy".to_string(),
        timestamp: now.to_rfc3339(),
        uptime,
        connected: sessions.is_connected().await,
        messenger_backend: backend.0.clone(),
    })
}
