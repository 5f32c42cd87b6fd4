//! Bulk message delivery
//!
//! Walks the session's chats and sends the same text to every requested
//! one. A failing chat is recorded and skipped; it never stops the loop.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{info, warn};

use crate::errors::{ChatcasterError, Result};
use crate::messenger::ChatId;
use crate::session::ActiveSession;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendError {
    pub chat_id: ChatId,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendReport {
    pub messages_sent_count: usize,
    pub send_errors: Vec<SendError>,
    /// Requested ids that are not among the user's chats
    pub unknown_chats_ids: Vec<ChatId>,
}

pub struct BroadcastService;

impl BroadcastService {
    pub async fn send_to_chats(
        session: &ActiveSession,
        chats_ids: &[ChatId],
        message: &str,
    ) -> Result<SendReport> {
        if message.trim().is_empty() {
            return Err(ChatcasterError::validation("message must not be empty"));
        }
        if chats_ids.is_empty() {
            return Err(ChatcasterError::validation(
                "at least one chat must be selected",
            ));
        }

        let requested: HashSet<ChatId> = chats_ids.iter().copied().collect();
        let all_chats = session.all_chats(false).await?;
        let mut report = SendReport::default();

        for &chat_id in all_chats.iter().filter(|id| requested.contains(id)) {
            match session.send_text_message(chat_id, message).await {
                Ok(_) => report.messages_sent_count += 1,
                Err(e) => {
                    warn!("Sending to chat {} failed: {}", chat_id, e);
                    report.send_errors.push(SendError {
                        chat_id,
                        message: e.message().to_string(),
                    });
                }
            }
        }

        let known: HashSet<ChatId> = all_chats.iter().copied().collect();
        let mut seen = HashSet::new();
        report.unknown_chats_ids = chats_ids
            .iter()
            .copied()
            .filter(|id| !known.contains(id) && seen.insert(*id))
            .collect();

        info!(
            "Broadcast for {}: {} sent, {} failed, {} unknown",
            session.phone_number(),
            report.messages_sent_count,
            report.send_errors.len(),
            report.unknown_chats_ids.len()
        );
        Ok(report)
    }
}
