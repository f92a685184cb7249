/// Database connection management and migrations
pub mod connection;
/// Row models and their queries
pub mod models;
/// The proverb store contract used by the bot and the CLI
pub mod store;
