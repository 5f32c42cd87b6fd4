use std::sync::Arc;

use actix_web::{HttpResponse, web};
use tracing::trace;

use crate::services::ChatService;
use crate::session::SessionManager;

use super::helpers::{api_result, error_response};
use super::types::GetChatsQuery;

/// GET /getChats
pub async fn get_chats(
    query: web::Query<GetChatsQuery>,
    sessions: web::Data<Arc<SessionManager>>,
) -> HttpResponse {
    let force_reload = query.reload.unwrap_or(false);
    trace!("API: chats request (reload: {})", force_reload);

    let session = match sessions.current().await {
        Ok(session) => session,
        Err(e) => return error_response(&e),
    };

    api_result(ChatService::list_chats(&session, force_reload).await)
}
