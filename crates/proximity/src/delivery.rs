use async_trait::async_trait;
use model::alert::AlertPayload;

use crate::DeliveryError;

/// Sends one message to one device. No retries or batching are expected from
/// callers; an implementation may retry internally.
#[async_trait]
pub trait MessageDelivery: Send + Sync {
    async fn deliver(&self, address: &str, payload: &AlertPayload) -> Result<(), DeliveryError>;
}

/// Writes messages to the log instead of sending them. For local runs without
/// a push gateway.
#[derive(Debug, Clone, Default)]
pub struct LogDelivery;

#[async_trait]
impl MessageDelivery for LogDelivery {
    async fn deliver(&self, address: &str, payload: &AlertPayload) -> Result<(), DeliveryError> {
        if address.trim().is_empty() {
            return Err(DeliveryError::InvalidAddress);
        }
        log::info!(
            "would deliver '{}' to {}: {:?}",
            payload.title,
            address,
            payload.data
        );
        Ok(())
    }
}
