use std::sync::Arc;

use actix_web::{HttpResponse, web};
use tracing::trace;

use crate::services::ChatListService;
use crate::session::SessionManager;

use super::helpers::{api_result, error_response, success_response};
use super::types::CreateChatsListRequest;

/// GET /getChatsLists
pub async fn get_chats_lists(
    sessions: web::Data<Arc<SessionManager>>,
    chat_lists: web::Data<Arc<ChatListService>>,
) -> HttpResponse {
    let session = match sessions.current().await {
        Ok(session) => session,
        Err(e) => return error_response(&e),
    };

    let lists = chat_lists.list(session.phone_number());
    trace!(
        "API: {} chat lists for {}",
        lists.len(),
        session.phone_number()
    );
    success_response(lists)
}

/// POST /createChatsList
pub async fn create_chats_list(
    body: web::Json<CreateChatsListRequest>,
    sessions: web::Data<Arc<SessionManager>>,
    chat_lists: web::Data<Arc<ChatListService>>,
) -> HttpResponse {
    let session = match sessions.current().await {
        Ok(session) => session,
        Err(e) => return error_response(&e),
    };

    api_result(chat_lists.create(session.phone_number(), &body.name, &body.chats_ids))
}
