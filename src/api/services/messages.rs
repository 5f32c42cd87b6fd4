use std::sync::Arc;

use actix_web::{HttpResponse, web};
use tracing::info;

use crate::services::BroadcastService;
use crate::session::SessionManager;

use super::helpers::{api_result, error_response};
use super::types::SendMessagesRequest;

/// POST /sendMessages
pub async fn send_messages(
    body: web::Json<SendMessagesRequest>,
    sessions: web::Data<Arc<SessionManager>>,
) -> HttpResponse {
    let session = match sessions.current().await {
        Ok(session) => session,
        Err(e) => return error_response(&e),
    };

    info!(
        "API: broadcast to {} chats requested by {}",
        body.chats_ids.len(),
        session.phone_number()
    );

    api_result(BroadcastService::send_to_chats(&session, &body.chats_ids, &body.message).await)
}
