use std::collections::HashSet;
use std::sync::Arc;

use tracing::info;

use crate::errors::{ChatcasterError, Result};
use crate::messenger::ChatId;
use crate::storage::{ChatListStore, ChatsList};

/// Chat-list operations scoped to one phone number
pub struct ChatListService {
    store: Arc<ChatListStore>,
}

impl ChatListService {
    pub fn new(store: Arc<ChatListStore>) -> Self {
        Self { store }
    }

    pub fn list(&self, phone_number: &str) -> Vec<ChatsList> {
        self.store.get_chats_lists(phone_number)
    }

    /// Save a new list; the name is trimmed and ids keep their first occurrence
    pub fn create(&self, phone_number: &str, name: &str, chats_ids: &[ChatId]) -> Result<ChatsList> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ChatcasterError::validation("name must not be empty"));
        }

        let mut seen = HashSet::new();
        let chats_list = ChatsList {
            name: name.to_string(),
            chats_ids: chats_ids
                .iter()
                .copied()
                .filter(|id| seen.insert(*id))
                .collect(),
        };

        self.store
            .append_chats_list(phone_number, chats_list.clone())?;
        info!(
            "Created chat list '{}' ({} chats) for {}",
            chats_list.name,
            chats_list.chats_ids.len(),
            phone_number
        );
        Ok(chats_list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_trims_and_dedupes() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(ChatListStore::open(dir.path().join("s.json")).unwrap());
        let service = ChatListService::new(store);

        let list = service.create("+1", "  friends ", &[3, 1, 3, 2, 1]).unwrap();
        assert_eq!(list.name, "friends");
        assert_eq!(list.chats_ids, vec![3, 1, 2]);
        assert_eq!(service.list("+1"), vec![list]);
    }

    #[test]
    fn test_blank_name_rejected() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(ChatListStore::open(dir.path().join("s.json")).unwrap());
        let service = ChatListService::new(store);

        let err = service.create("+1", "   ", &[1]).unwrap_err();
        assert!(matches!(err, ChatcasterError::Validation(_)));
        assert!(service.list("+1").is_empty());
    }
}
