//! API 类型定义

use serde::{Deserialize, Serialize};

use crate::messenger::{ChatId, MessengerUser};

/// Envelope shared by every JSON endpoint
///
/// `{"success": true, "data": ...}` or `{"success": false, "error": "..."}`
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequest {
    pub phone_number: String,
    pub code: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub first_name: String,
}

impl From<MessengerUser> for UserResponse {
    fn from(user: MessengerUser) -> Self {
        Self {
            first_name: user.first_name,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    pub logged_out: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct GetChatsQuery {
    pub reload: Option<bool>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SendMessagesRequest {
    pub chats_ids: Vec<ChatId>,
    pub message: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateChatsListRequest {
    pub name: String,
    #[serde(default)]
    pub chats_ids: Vec<ChatId>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub uptime: u64,
    pub connected: bool,
    pub messenger_backend: String,
}
