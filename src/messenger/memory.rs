//! In-process messenger backend
//!
//! Accounts, chats and delivered messages live in memory. Integration tests
//! drive the whole server through it, and `messenger.backend = "memory"`
//! runs the UI against a demo account without a real platform.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, info};

use super::{
    ChatId, Credentials, MessengerChat, MessengerConnector, MessengerSession, MessengerUser,
    SentMessage,
};
use crate::errors::{ChatcasterError, Result};

const DEMO_CHAT_COUNT: i64 = 5;
const DEMO_CHAT_ID_BASE: ChatId = 1000;

#[derive(Debug, Clone)]
pub struct MemoryAccount {
    pub code: String,
    pub user: MessengerUser,
    pub chats: Vec<MessengerChat>,
}

impl MemoryAccount {
    pub fn new(code: impl Into<String>, first_name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            user: MessengerUser {
                id: 1,
                first_name: first_name.into(),
                last_name: String::new(),
                username: None,
            },
            chats: Vec::new(),
        }
    }

    pub fn with_chat(mut self, id: ChatId, title: impl Into<String>) -> Self {
        self.chats.push(MessengerChat {
            id,
            title: title.into(),
        });
        self
    }

    fn demo(code: &str) -> Self {
        (1..=DEMO_CHAT_COUNT).fold(Self::new(code, "Demo"), |account, n| {
            account.with_chat(DEMO_CHAT_ID_BASE + n, format!("Demo chat {}", n))
        })
    }
}

/// A message accepted by the memory backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySentMessage {
    pub phone_number: String,
    pub chat_id: ChatId,
    pub text: String,
}

#[derive(Default)]
struct MemoryState {
    accounts: HashMap<String, MemoryAccount>,
    failing_chats: HashSet<ChatId>,
    sent: Vec<MemorySentMessage>,
    logged_out: Vec<String>,
    connects: usize,
    next_message_id: i64,
}

/// Connector handle; clones share the same state
#[derive(Clone, Default)]
pub struct MemoryMessenger {
    state: Arc<Mutex<MemoryState>>,
    demo_code: Option<String>,
}

impl MemoryMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Any phone number logs in with `code` and gets the demo chats
    pub fn demo(code: &str) -> Self {
        Self {
            state: Arc::default(),
            demo_code: Some(code.to_string()),
        }
    }

    pub fn with_account(self, phone_number: &str, account: MemoryAccount) -> Self {
        self.add_account(phone_number, account);
        self
    }

    pub fn add_account(&self, phone_number: &str, account: MemoryAccount) {
        self.state
            .lock()
            .accounts
            .insert(phone_number.to_string(), account);
    }

    /// Every send to `chat_id` fails from now on
    pub fn fail_chat(&self, chat_id: ChatId) {
        self.state.lock().failing_chats.insert(chat_id);
    }

    pub fn sent_messages(&self) -> Vec<MemorySentMessage> {
        self.state.lock().sent.clone()
    }

    /// Phone numbers whose sessions were logged out, in order
    pub fn logged_out(&self) -> Vec<String> {
        self.state.lock().logged_out.clone()
    }

    pub fn connect_count(&self) -> usize {
        self.state.lock().connects
    }
}

#[async_trait]
impl MessengerConnector for MemoryMessenger {
    async fn connect(&self, credentials: &Credentials) -> Result<Arc<dyn MessengerSession>> {
        let mut state = self.state.lock();
        state.connects += 1;

        if !state.accounts.contains_key(&credentials.phone_number)
            && let Some(code) = &self.demo_code
        {
            state
                .accounts
                .insert(credentials.phone_number.clone(), MemoryAccount::demo(code));
        }

        let account = state
            .accounts
            .get(&credentials.phone_number)
            .ok_or_else(|| {
                ChatcasterError::auth_failed(format!(
                    "Unknown phone number: {}",
                    credentials.phone_number
                ))
            })?;

        if account.code != credentials.code {
            return Err(ChatcasterError::auth_failed("PHONE_CODE_INVALID"));
        }

        info!("Memory session opened for {}", credentials.phone_number);

        Ok(Arc::new(MemorySession {
            state: self.state.clone(),
            phone_number: credentials.phone_number.clone(),
            closed: AtomicBool::new(false),
        }))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

struct MemorySession {
    state: Arc<Mutex<MemoryState>>,
    phone_number: String,
    closed: AtomicBool,
}

impl MemorySession {
    fn with_account<T>(&self, f: impl FnOnce(&MemoryAccount) -> Result<T>) -> Result<T> {
        if self.closed.load(Ordering::Acquire) {
            return Err(ChatcasterError::messenger("Session is closed"));
        }
        let state = self.state.lock();
        let account = state
            .accounts
            .get(&self.phone_number)
            .ok_or_else(|| ChatcasterError::messenger("Account no longer exists"))?;
        f(account)
    }
}

#[async_trait]
impl MessengerSession for MemorySession {
    async fn get_me(&self) -> Result<MessengerUser> {
        self.with_account(|account| Ok(account.user.clone()))
    }

    async fn get_chat_ids(&self, limit: usize) -> Result<Vec<ChatId>> {
        self.with_account(|account| Ok(account.chats.iter().take(limit).map(|c| c.id).collect()))
    }

    async fn get_chat(&self, chat_id: ChatId) -> Result<MessengerChat> {
        self.with_account(|account| {
            account
                .chats
                .iter()
                .find(|c| c.id == chat_id)
                .cloned()
                .ok_or_else(|| ChatcasterError::messenger(format!("Chat not found: {}", chat_id)))
        })
    }

    async fn send_text_message(&self, chat_id: ChatId, text: &str) -> Result<SentMessage> {
        self.with_account(|account| {
            if account.chats.iter().any(|c| c.id == chat_id) {
                Ok(())
            } else {
                Err(ChatcasterError::messenger(format!(
                    "Chat not found: {}",
                    chat_id
                )))
            }
        })?;

        let mut state = self.state.lock();
        if state.failing_chats.contains(&chat_id) {
            return Err(ChatcasterError::messenger(format!(
                "CHAT_WRITE_FORBIDDEN: {}",
                chat_id
            )));
        }

        state.next_message_id += 1;
        let id = state.next_message_id;
        state.sent.push(MemorySentMessage {
            phone_number: self.phone_number.clone(),
            chat_id,
            text: text.to_string(),
        });
        debug!("Memory message {} delivered to chat {}", id, chat_id);

        Ok(SentMessage { id, chat_id })
    }

    async fn log_out(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Err(ChatcasterError::messenger("Session is closed"));
        }
        self.state.lock().logged_out.push(self.phone_number.clone());
        Ok(())
    }

    async fn destroy(&self) -> Result<()> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}
