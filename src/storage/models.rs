use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::messenger::ChatId;

/// A named set of chats saved by one account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatsList {
    pub name: String,
    pub chats_ids: Vec<ChatId>,
}

/// On-disk document: `{"chatsLists": {"<phone>": [ChatsList, ...]}}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsDocument {
    #[serde(default)]
    pub chats_lists: BTreeMap<String, Vec<ChatsList>>,
}
