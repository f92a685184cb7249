/// HTTP health check endpoints
pub mod health;
/// Recurring proverb delivery scheduling
pub mod subscription;
