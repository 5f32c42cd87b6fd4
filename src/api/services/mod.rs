//! HTTP handlers
//!
//! Endpoint paths follow what the browser UI calls; every JSON endpoint
//! answers with the `ApiResponse` envelope.

pub mod auth;
pub mod chat_lists;
pub mod chats;
pub mod frontend;
pub mod health;
pub mod helpers;
pub mod messages;
pub mod types;

use actix_web::web;

pub use health::{AppStartTime, MessengerBackendName};
pub use types::*;

/// JSON API routes
///
/// 包含：
/// - POST /auth, POST /logout, GET /getCurrentUser
/// - GET /getChats
/// - POST /sendMessages
/// - GET /getChatsLists, POST /createChatsList
/// - GET /health
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(helpers::json_config())
        .route("/auth", web::post().to(auth::authenticate))
        .route("/logout", web::post().to(auth::logout))
        .route("/getCurrentUser", web::get().to(auth::get_current_user))
        .route("/getChats", web::get().to(chats::get_chats))
        .route("/sendMessages", web::post().to(messages::send_messages))
        .route("/getChatsLists", web::get().to(chat_lists::get_chats_lists))
        .route(
            "/createChatsList",
            web::post().to(chat_lists::create_chats_list),
        )
        .route("/health", web::get().to(health::health_check))
        .route("/health", web::head().to(health::health_check));
}

/// Embedded UI; must be registered after the API routes
pub fn frontend_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(frontend::handle_index))
        .route("/{path:.*}", web::get().to(frontend::handle_static));
}
