//! Shared fixtures for the integration tests

#![allow(dead_code)]

use std::sync::Arc;

use tempfile::TempDir;

use chatcaster::messenger::{MemoryAccount, MemoryMessenger};
use chatcaster::runtime::lifetime::startup::{StartupContext, build_context};
use chatcaster::session::ChatCacheSettings;
use chatcaster::storage::ChatListStore;

pub const PHONE: &str = "+15550001";
pub const OTHER_PHONE: &str = "+15550002";
pub const CODE: &str = "12345";

/// Keeps the temp dir alive for as long as the context is used
pub struct TestEnv {
    pub dir: TempDir,
    pub messenger: MemoryMessenger,
    pub context: StartupContext,
}

pub fn test_messenger() -> MemoryMessenger {
    MemoryMessenger::new()
        .with_account(
            PHONE,
            MemoryAccount::new(CODE, "Alice")
                .with_chat(1, "Family")
                .with_chat(2, "Work")
                .with_chat(3, "Football"),
        )
        .with_account(
            OTHER_PHONE,
            MemoryAccount::new(CODE, "Bob").with_chat(10, "Neighbours"),
        )
}

pub fn test_env() -> TestEnv {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = Arc::new(
        ChatListStore::open(dir.path().join("settings.json")).expect("Failed to open store"),
    );
    let messenger = test_messenger();
    let context = build_context(
        store,
        Arc::new(messenger.clone()),
        ChatCacheSettings::default(),
    );

    TestEnv {
        dir,
        messenger,
        context,
    }
}
