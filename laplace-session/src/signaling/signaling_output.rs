use async_trait::async_trait;
use laplace_core::SignalMessage;

/// Outbound half of the signaling channel.
///
/// Sends never fail from the caller's point of view: a broken socket shows up
/// on the inbound side as [`crate::signaling::SignalingEvent::Closed`].
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    async fn send(&self, message: SignalMessage);

    async fn close(&self);
}
