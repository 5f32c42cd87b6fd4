//! Server mode
//!
//! Wires the services together and runs the HTTP server until it stops or
//! a shutdown signal arrives.

use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::Result;
use tracing::warn;

use crate::api::middleware::{RequestIdMiddleware, TimingMiddleware};
use crate::api::services::{AppStartTime, MessengerBackendName, api_routes, frontend_routes};
use crate::config::get_config;
use crate::runtime::lifetime;

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    let config = get_config();
    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    let startup = lifetime::startup::prepare_server_startup(&config).map_err(|e| {
        tracing::error!("Server startup failed: {}", e);
        anyhow::anyhow!(e.format_simple())
    })?;

    let sessions = startup.sessions.clone();
    let chat_lists = startup.chat_lists.clone();
    let backend_name = MessengerBackendName(startup.messenger_backend.clone());

    let workers = config.server.cpu_count.clamp(1, 32);
    let bind_address = format!("{}:{}", config.server.host, config.server.port);

    let server_sessions = sessions.clone();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .wrap(Compress::default())
            .wrap(DefaultHeaders::new().add(("Cache-Control", "no-cache, no-store, must-revalidate")))
            .app_data(web::Data::new(server_sessions.clone()))
            .app_data(web::Data::new(chat_lists.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .app_data(web::Data::new(backend_name.clone()))
            .configure(api_routes)
            .configure(frontend_routes)
    })
    .workers(workers)
    .disable_signals()
    .bind(&bind_address)?
    .run();

    warn!("Starting server at http://{} ({} workers)", bind_address, workers);
    let handle = server.handle();

    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown(sessions) => {
            handle.stop(true).await;
            warn!("Graceful shutdown: all tasks completed");
        }
    }

    Ok(())
}
