use std::sync::Arc;

use tracing::{info, warn};

use crate::config::StaticConfig;
use crate::errors::Result;
use crate::messenger::{MessengerConnector, build_connector};
use crate::services::ChatListService;
use crate::session::{ChatCacheSettings, SessionManager};
use crate::storage::ChatListStore;

pub struct StartupContext {
    pub store: Arc<ChatListStore>,
    pub sessions: Arc<SessionManager>,
    pub chat_lists: Arc<ChatListService>,
    pub messenger_backend: String,
}

/// 准备服务器启动的上下文
/// 包括列表存储、消息客户端和会话管理
pub fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    config.validate()?;

    let store = Arc::new(ChatListStore::open(config.storage.settings_path())?);
    info!("Settings loaded from {}", store.file_path().display());

    let connector = build_connector(&config.messenger)?;
    if connector.name() == "memory" {
        warn!(
            "Memory messenger backend active: any phone number logs in with code {}",
            config.messenger.demo_code
        );
    }

    Ok(build_context(
        store,
        connector,
        ChatCacheSettings::from_config(&config.messenger),
    ))
}

/// Wire services around an existing store and connector
pub fn build_context(
    store: Arc<ChatListStore>,
    connector: Arc<dyn MessengerConnector>,
    cache_settings: ChatCacheSettings,
) -> StartupContext {
    let messenger_backend = connector.name().to_string();
    let sessions = Arc::new(SessionManager::new(connector, cache_settings));
    let chat_lists = Arc::new(ChatListService::new(store.clone()));

    StartupContext {
        store,
        sessions,
        chat_lists,
        messenger_backend,
    }
}
