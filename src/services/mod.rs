//! Service layer for business logic
//!
//! HTTP handlers and the CLI call into these instead of touching the
//! session or the store directly.

mod broadcast_service;
mod chat_list_service;
mod chat_service;

pub use broadcast_service::*;
pub use chat_list_service::*;
pub use chat_service::*;
