//! Chat-list persistence
//!
//! Chat lists are kept per phone number in a single JSON settings file.

mod chat_lists;
mod models;

pub use chat_lists::ChatListStore;
pub use models::{ChatsList, SettingsDocument};
