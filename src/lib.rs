//! Chatcaster - broadcast a message to many messenger chats at once
//!
//! A small local web service: the operator logs in with a phone number and
//! a one-time code, picks chats (or a saved chat list) and sends the same
//! text message to every one of them.
//!
//! # Features
//! - **server**: HTTP server mode (default)
//! - **cli**: Command-line interface
//!
//! # Architecture
//! - `messenger`: Messenger client seam and its backends
//! - `session`: The single authenticated session and its chat cache
//! - `storage`: Named chat lists persisted per phone number
//! - `services`: Chat listing, broadcasting and chat list management
//! - `api`: HTTP services and middleware
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging setup

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod messenger;
pub mod runtime;
pub mod services;
pub mod session;
pub mod storage;
pub mod system;
