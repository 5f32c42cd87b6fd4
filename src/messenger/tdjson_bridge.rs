//! TDLib JSON bridge backend
//!
//! Talks to an HTTP process that owns TDLib clients and forwards
//! `@type`-tagged JSON request objects to them:
//! - `POST   /clients`              -> `{"client_id": n}`
//! - `POST   /clients/{id}/execute` -> TDLib response object
//! - `DELETE /clients/{id}`
//!
//! ureq is blocking, so every call runs inside `spawn_blocking`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, info, trace, warn};
use ureq::Agent;

use super::{
    ChatId, Credentials, MessengerChat, MessengerConnector, MessengerSession, MessengerUser,
    SentMessage,
};
use crate::config::MessengerConfig;
use crate::errors::{ChatcasterError, Result};

const AUTHORIZATION_READY: &str = "authorizationStateReady";

struct BridgeTransport {
    agent: Agent,
    base_url: String,
}

impl BridgeTransport {
    fn new(base_url: &str, timeout: Duration) -> Self {
        // the bridge runs next to the server, never behind an env proxy
        let agent = Agent::config_builder()
            .proxy(None)
            .timeout_global(Some(timeout))
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn create_client_sync(&self) -> Result<i64> {
        #[derive(Deserialize)]
        struct Created {
            client_id: i64,
        }

        let url = format!("{}/clients", self.base_url);
        let created: Created = self.agent.post(&url).send_empty()?.into_body().read_json()?;
        debug!("Bridge created TDLib client {}", created.client_id);
        Ok(created.client_id)
    }

    /// Raw TDLib response; only transport failures are errors here
    fn execute_sync(&self, client_id: i64, request: &Value) -> Result<Value> {
        let url = format!("{}/clients/{}/execute", self.base_url, client_id);
        trace!("Bridge request to client {}: {}", client_id, request["@type"]);

        let response: Value = self
            .agent
            .post(&url)
            .send_json(request)?
            .into_body()
            .read_json()?;
        Ok(response)
    }

    fn close_quietly(&self, client_id: i64) {
        if let Err(e) = self.close_client_sync(client_id) {
            warn!("Failed to close TDLib client {}: {}", client_id, e);
        }
    }

    fn close_client_sync(&self, client_id: i64) -> Result<()> {
        let url = format!("{}/clients/{}", self.base_url, client_id);
        self.agent.delete(&url).call()?;
        debug!("Bridge closed TDLib client {}", client_id);
        Ok(())
    }
}

/// TDLib reports failures as `{"@type": "error", "code": .., "message": ..}`
fn check_td_error(response: Value) -> Result<Value> {
    if response["@type"].as_str() == Some("error") {
        let code = response["code"].as_i64().unwrap_or_default();
        let message = response["message"].as_str().unwrap_or("unknown error");
        return Err(ChatcasterError::messenger(format!(
            "TDLib error {}: {}",
            code, message
        )));
    }
    Ok(response)
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| ChatcasterError::messenger(format!("Unexpected TDLib response: {}", e)))
}

async fn run_blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ChatcasterError::messenger(format!("Bridge task failed: {}", e)))?
}

#[derive(Deserialize)]
struct TdUser {
    id: i64,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    usernames: Option<TdUsernames>,
}

#[derive(Deserialize)]
struct TdUsernames {
    #[serde(default)]
    active_usernames: Vec<String>,
}

#[derive(Deserialize)]
struct TdChats {
    #[serde(default)]
    chat_ids: Vec<ChatId>,
}

#[derive(Deserialize)]
struct TdChat {
    id: ChatId,
    #[serde(default)]
    title: String,
}

#[derive(Deserialize)]
struct TdMessage {
    id: i64,
    chat_id: ChatId,
}

pub struct TdJsonBridgeConnector {
    transport: Arc<BridgeTransport>,
    api_id: i32,
    api_hash: String,
    log_verbosity: i32,
}

impl TdJsonBridgeConnector {
    pub fn from_config(config: &MessengerConfig) -> Result<Self> {
        if config.api_id == 0 || config.api_hash.is_empty() {
            return Err(ChatcasterError::config(
                "messenger.api_id and messenger.api_hash (or API_ID / API_HASH) are required for the tdjson_bridge backend",
            ));
        }

        Ok(Self {
            transport: Arc::new(BridgeTransport::new(
                &config.bridge_url,
                Duration::from_secs(config.request_timeout_secs),
            )),
            api_id: config.api_id,
            api_hash: config.api_hash.clone(),
            log_verbosity: config.log_verbosity,
        })
    }

    fn authentication_requests(&self, credentials: &Credentials) -> Vec<Value> {
        let database_key: String = credentials
            .phone_number
            .chars()
            .filter(char::is_ascii_digit)
            .collect();

        vec![
            json!({
                "@type": "setLogVerbosityLevel",
                "new_verbosity_level": self.log_verbosity,
            }),
            json!({
                "@type": "setTdlibParameters",
                "database_directory": format!("tdlib/{}", database_key),
                "use_message_database": true,
                "use_secret_chats": false,
                "api_id": self.api_id,
                "api_hash": self.api_hash,
                "system_language_code": "en",
                "device_model": "chatcaster",
                "application_version": env!("CARGO_PKG_VERSION"),
            }),
            json!({
                "@type": "setAuthenticationPhoneNumber",
                "phone_number": credentials.phone_number,
            }),
            json!({
                "@type": "checkAuthenticationCode",
                "code": credentials.code,
            }),
            json!({ "@type": "getAuthorizationState" }),
        ]
    }
}

#[async_trait]
impl MessengerConnector for TdJsonBridgeConnector {
    async fn connect(&self, credentials: &Credentials) -> Result<Arc<dyn MessengerSession>> {
        let transport = self.transport.clone();
        let requests = self.authentication_requests(credentials);
        let phone = credentials.phone_number.clone();

        let client_id = run_blocking(move || {
            let client_id = transport.create_client_sync()?;

            let mut last = Value::Null;
            for request in &requests {
                // bridge unreachable stays a Messenger error; TDLib rejecting
                // the phone number or code is an authentication failure
                let outcome = transport.execute_sync(client_id, request).and_then(|response| {
                    check_td_error(response).map_err(|e| ChatcasterError::auth_failed(e.message()))
                });
                match outcome {
                    Ok(response) => last = response,
                    Err(e) => {
                        transport.close_quietly(client_id);
                        return Err(e);
                    }
                }
            }

            let state = last["@type"].as_str().unwrap_or("unknown");
            if state != AUTHORIZATION_READY {
                transport.close_quietly(client_id);
                return Err(ChatcasterError::auth_failed(format!(
                    "Authorization incomplete for {}: {}",
                    phone, state
                )));
            }

            Ok(client_id)
        })
        .await?;

        info!(
            "TDLib client {} authorized for {}",
            client_id, credentials.phone_number
        );

        Ok(Arc::new(TdJsonBridgeSession {
            transport: self.transport.clone(),
            client_id,
        }))
    }

    fn name(&self) -> &'static str {
        "tdjson_bridge"
    }
}

pub struct TdJsonBridgeSession {
    transport: Arc<BridgeTransport>,
    client_id: i64,
}

impl TdJsonBridgeSession {
    async fn execute(&self, request: Value) -> Result<Value> {
        let transport = self.transport.clone();
        let client_id = self.client_id;
        run_blocking(move || check_td_error(transport.execute_sync(client_id, &request)?)).await
    }
}

#[async_trait]
impl MessengerSession for TdJsonBridgeSession {
    async fn get_me(&self) -> Result<MessengerUser> {
        let user: TdUser = decode(self.execute(json!({ "@type": "getMe" })).await?)?;

        Ok(MessengerUser {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            username: user
                .usernames
                .and_then(|u| u.active_usernames.into_iter().next()),
        })
    }

    async fn get_chat_ids(&self, limit: usize) -> Result<Vec<ChatId>> {
        let chats: TdChats = decode(
            self.execute(json!({
                "@type": "getChats",
                "chat_list": { "@type": "chatListMain" },
                "limit": limit,
            }))
            .await?,
        )?;
        Ok(chats.chat_ids)
    }

    async fn get_chat(&self, chat_id: ChatId) -> Result<MessengerChat> {
        let chat: TdChat = decode(
            self.execute(json!({ "@type": "getChat", "chat_id": chat_id }))
                .await?,
        )?;
        Ok(MessengerChat {
            id: chat.id,
            title: chat.title,
        })
    }

    async fn send_text_message(&self, chat_id: ChatId, text: &str) -> Result<SentMessage> {
        let message: TdMessage = decode(
            self.execute(json!({
                "@type": "sendMessage",
                "chat_id": chat_id,
                "input_message_content": {
                    "@type": "inputMessageText",
                    "text": { "@type": "formattedText", "text": text },
                },
            }))
            .await?,
        )?;
        Ok(SentMessage {
            id: message.id,
            chat_id: message.chat_id,
        })
    }

    async fn log_out(&self) -> Result<()> {
        self.execute(json!({ "@type": "logOut" })).await?;
        Ok(())
    }

    async fn destroy(&self) -> Result<()> {
        let transport = self.transport.clone();
        let client_id = self.client_id;
        run_blocking(move || transport.close_client_sync(client_id)).await
    }
}
