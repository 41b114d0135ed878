pub mod telegram;

use async_trait::async_trait;

/// Outbound transport seam. `to` is a platform chat identifier.
#[async_trait]
pub trait MessagingProvider: Send + Sync {
    async fn send_message(&self, to: &str, body: &str) -> anyhow::Result<()>;
}
