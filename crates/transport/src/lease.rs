use async_trait::async_trait;

use crate::TransportError;

/// Back-channel a [`Lease`] uses to tell its owning transport that a message
/// was handled. Transports implement this privately and hand out `Lease`
/// values wrapping it; dispatcher code never sees the concrete type.
#[async_trait]
pub trait LeaseAck: Send + Sync {
    async fn acknowledge(self: Box<Self>) -> Result<(), TransportError>;
}

/// Transient ownership of an in-flight message.
///
/// Expires on the broker side after the transport's acknowledgement timeout
/// unless [`Lease::acknowledge`] is called first, at which point the message
/// is redelivered to another consumer.
pub struct Lease {
    delivery_count: u32,
    ack: Box<dyn LeaseAck>,
}

impl Lease {
    pub fn new(delivery_count: u32, ack: Box<dyn LeaseAck>) -> Self {
        Self { delivery_count, ack }
    }

    /// How many times this message has been delivered, including this one.
    /// `1` on first delivery; the reclaim pass increments it on redelivery.
    pub fn delivery_count(&self) -> u32 {
        self.delivery_count
    }

    pub async fn acknowledge(self) -> Result<(), TransportError> {
        self.ack.acknowledge().await
    }
}

impl std::fmt::Debug for Lease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lease").field("delivery_count", &self.delivery_count).finish()
    }
}
