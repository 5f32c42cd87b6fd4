//! Messaging client abstraction
//!
//! Authentication, chat retrieval and message delivery all belong to the
//! messaging platform's client library. The rest of the server only talks
//! to the two traits below; backends are picked from `messenger.backend`:
//! - `tdjson_bridge`: TDLib JSON requests sent to an HTTP bridge process
//! - `memory`: in-process accounts, used by tests and demo mode

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::config::MessengerConfig;
use crate::errors::{ChatcasterError, Result};

pub mod memory;
pub mod tdjson_bridge;
mod types;

pub use memory::{MemoryAccount, MemoryMessenger, MemorySentMessage};
pub use tdjson_bridge::TdJsonBridgeConnector;
pub use types::{ChatId, Credentials, MessengerChat, MessengerUser, SentMessage};

/// One authenticated connection to the messaging platform
#[async_trait]
pub trait MessengerSession: Send + Sync {
    /// Profile of the logged-in user
    async fn get_me(&self) -> Result<MessengerUser>;

    /// Ids of the user's chats, in the platform's chat-list order
    async fn get_chat_ids(&self, limit: usize) -> Result<Vec<ChatId>>;

    async fn get_chat(&self, chat_id: ChatId) -> Result<MessengerChat>;

    async fn send_text_message(&self, chat_id: ChatId, text: &str) -> Result<SentMessage>;

    /// Terminates the authorization on the platform side
    async fn log_out(&self) -> Result<()>;

    /// Releases local client resources
    async fn destroy(&self) -> Result<()>;
}

/// Opens authenticated sessions
#[async_trait]
pub trait MessengerConnector: Send + Sync {
    async fn connect(&self, credentials: &Credentials) -> Result<Arc<dyn MessengerSession>>;

    /// 获取 backend 名称（用于日志）
    fn name(&self) -> &'static str;
}

/// Build the connector selected by configuration
pub fn build_connector(config: &MessengerConfig) -> Result<Arc<dyn MessengerConnector>> {
    let connector: Arc<dyn MessengerConnector> = match config.backend.as_str() {
        "tdjson_bridge" => Arc::new(TdJsonBridgeConnector::from_config(config)?),
        "memory" => Arc::new(MemoryMessenger::demo(&config.demo_code)),
        other => {
            return Err(ChatcasterError::config(format!(
                "Unknown messenger backend: {}",
                other
            )));
        }
    };

    info!("Using messenger backend: {}", connector.name());
    Ok(connector)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_memory_connector() {
        let config = MessengerConfig {
            backend: "memory".to_string(),
            ..Default::default()
        };
        let connector = build_connector(&config).expect("memory backend builds");
        assert_eq!(connector.name(), "memory");
    }

    #[test]
    fn test_bridge_requires_api_credentials() {
        let config = MessengerConfig::default();
        let err = build_connector(&config).err().expect("missing api id rejected");
        assert!(matches!(err, ChatcasterError::Config(_)));
    }

    #[test]
    fn test_unknown_backend() {
        let config = MessengerConfig {
            backend: "smoke-signals".to_string(),
            ..Default::default()
        };
        assert!(build_connector(&config).is_err());
    }
}
