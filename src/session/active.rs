use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tokio::sync::{OnceCell, RwLock};
use tracing::{debug, trace, warn};

use crate::config::MessengerConfig;
use crate::errors::Result;
use crate::messenger::{ChatId, MessengerChat, MessengerSession, MessengerUser, SentMessage};

/// Time allowed for log out + destroy when a session ends
const END_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct ChatCacheSettings {
    pub chat_limit: usize,
    pub ttl: Duration,
    pub capacity: u64,
}

impl ChatCacheSettings {
    pub fn from_config(config: &MessengerConfig) -> Self {
        Self {
            chat_limit: config.chat_limit,
            ttl: Duration::from_secs(config.chat_cache_ttl_secs),
            capacity: config.chat_cache_capacity,
        }
    }
}

impl Default for ChatCacheSettings {
    fn default() -> Self {
        Self::from_config(&MessengerConfig::default())
    }
}

/// The logged-in user's session plus what it has already fetched
pub struct ActiveSession {
    phone_number: String,
    session: Arc<dyn MessengerSession>,
    chat_limit: usize,
    user: OnceCell<MessengerUser>,
    chat_ids: RwLock<Option<Arc<Vec<ChatId>>>>,
    chats: Cache<ChatId, MessengerChat>,
}

impl ActiveSession {
    pub fn new(
        phone_number: String,
        session: Arc<dyn MessengerSession>,
        settings: &ChatCacheSettings,
    ) -> Self {
        let chats = Cache::builder()
            .time_to_live(settings.ttl)
            .max_capacity(settings.capacity)
            .build();

        Self {
            phone_number,
            session,
            chat_limit: settings.chat_limit,
            user: OnceCell::new(),
            chat_ids: RwLock::new(None),
            chats,
        }
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    /// Profile of the logged-in user, fetched once per session
    pub async fn user(&self) -> Result<MessengerUser> {
        self.user
            .get_or_try_init(|| self.session.get_me())
            .await
            .cloned()
    }

    /// Chat ids of the user, cached until `force_reload`
    pub async fn all_chats(&self, force_reload: bool) -> Result<Arc<Vec<ChatId>>> {
        if !force_reload && let Some(ids) = self.chat_ids.read().await.as_ref() {
            return Ok(ids.clone());
        }

        let mut slot = self.chat_ids.write().await;
        if !force_reload && let Some(ids) = slot.as_ref() {
            return Ok(ids.clone());
        }

        let ids = Arc::new(self.session.get_chat_ids(self.chat_limit).await?);
        debug!(
            "Loaded {} chats for {}",
            ids.len(),
            self.phone_number
        );
        if force_reload {
            self.chats.invalidate_all();
        }
        *slot = Some(ids.clone());
        Ok(ids)
    }

    /// Chat details, cached per chat id
    pub async fn chat(&self, chat_id: ChatId) -> Result<MessengerChat> {
        if let Some(chat) = self.chats.get(&chat_id).await {
            trace!("Chat cache hit for {}", chat_id);
            return Ok(chat);
        }

        let chat = self.session.get_chat(chat_id).await?;
        self.chats.insert(chat_id, chat.clone()).await;
        Ok(chat)
    }

    pub async fn send_text_message(&self, chat_id: ChatId, text: &str) -> Result<SentMessage> {
        self.session.send_text_message(chat_id, text).await
    }

    /// Log out and destroy the underlying client; failures are only logged
    pub async fn end(&self) {
        let timeout = Duration::from_secs(END_TIMEOUT_SECS);

        match tokio::time::timeout(timeout, self.session.log_out()).await {
            Ok(Ok(())) => debug!("Logged out {}", self.phone_number),
            Ok(Err(e)) => warn!("Log out failed for {}: {}", self.phone_number, e),
            Err(_) => warn!("Log out timed out for {}", self.phone_number),
        }

        match tokio::time::timeout(timeout, self.session.destroy()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Destroying session of {} failed: {}", self.phone_number, e),
            Err(_) => warn!("Destroying session of {} timed out", self.phone_number),
        }
    }
}
