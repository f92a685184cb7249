//! # Proverb of the Day Bot
//!
//! A Telegram bot that stores proverbs in SQLite, replies to any direct
//! message with a random proverb, and can push a proverb to a subscribed
//! chat on a fixed interval.
//!
//! ## Features
//! - Random proverb reply to any message
//! - `/subscribe` and `/unsubscribe` for recurring delivery
//! - Bulk loading from a line-oriented text file via the `potd` CLI
//! - Persistent storage with SQLite

/// Bot command handlers and message processing
pub mod bot;
/// Configuration management and environment variables
pub mod config;
/// Database models, connections, and the proverb store
pub mod database;
/// Bulk-load parsing for line-oriented proverb files
pub mod loader;
/// Background services: subscription scheduling and health checks
pub mod services;
/// Utility functions for hashing, formatting, and logging
pub mod utils;
