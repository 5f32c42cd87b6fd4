use futures_util::future::try_join_all;
use serde::Serialize;
use tracing::info;

use crate::errors::{ChatcasterError, Result};
use crate::messenger::ChatId;
use crate::session::ActiveSession;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatSummary {
    pub id: ChatId,
    pub title: String,
}

pub struct ChatService;

impl ChatService {
    /// Every chat of the session with its title, in chat-list order
    pub async fn list_chats(session: &ActiveSession, force_reload: bool) -> Result<Vec<ChatSummary>> {
        let chat_ids = session.all_chats(force_reload).await?;

        let chats = try_join_all(chat_ids.iter().map(|&id| async move {
            let chat = session.chat(id).await?;
            Ok::<_, ChatcasterError>(ChatSummary {
                id,
                title: chat.title,
            })
        }))
        .await?;

        info!(
            "Listed {} chats for {}",
            chats.len(),
            session.phone_number()
        );
        Ok(chats)
    }
}
