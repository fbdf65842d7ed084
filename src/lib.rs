//! # Nudge Bot
//!
//! A Telegram bot that lets a small study group check on each other and send
//! "wake up" nudges to people who are not tracking time yet.
//!
//! ## Features
//! - Nudge one person or everybody, with an optional custom message
//! - Per-requester cooldown so nobody gets spammed
//! - Skips people who are already tracking time in Toggl
//! - Replies to a nudge are forwarded back to whoever sent it
//! - Persistent storage with SQLite

/// Bot command handlers and message processing
pub mod bot;
/// Configuration management and environment variables
pub mod config;
/// Database models, connections, and migrations
pub mod database;
/// Error types shared by the storage, delivery and probe layers
pub mod error;
/// Wake engine, reply routing and the external services they talk to
pub mod services;
/// Utility functions for escaping, validation, logging and feedback
pub mod utils;
