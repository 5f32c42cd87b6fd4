use serde::{Deserialize, Serialize};

/// Chat identifier as used by the messaging platform
pub type ChatId = i64;

/// Phone number + login code pair used to open a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub phone_number: String,
    pub code: String,
}

impl Credentials {
    pub fn new(phone_number: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            phone_number: phone_number.into(),
            code: code.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessengerUser {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessengerChat {
    pub id: ChatId,
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentMessage {
    pub id: i64,
    pub chat_id: ChatId,
}
