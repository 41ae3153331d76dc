use crate::error::SessionError;
use crate::media::RemoteTrack;
use crate::session::SessionContext;
use async_trait::async_trait;
use laplace_core::{AssistantCommand, RoomId, SessionId, Status};

/// Hooks through which a session reports to the UI layer.
///
/// Every method has an empty default; implement what you display.
#[async_trait]
pub trait SessionObserver: Send + Sync + 'static {
    /// The room identifier is known (claim token or `newRoom`).
    async fn on_room_ready(&self, _ctx: &SessionContext, _room_id: &RoomId) {}

    async fn on_link_added(&self, _ctx: &SessionContext, _session_id: &SessionId) {}

    async fn on_link_connected(&self, _ctx: &SessionContext, _session_id: &SessionId) {}

    async fn on_link_removed(&self, _ctx: &SessionContext, _session_id: &SessionId) {}

    async fn on_status(&self, _ctx: &SessionContext, _status: &Status) {}

    async fn on_latency(&self, _ctx: &SessionContext, _session_id: &SessionId, _millis: u64) {}

    async fn on_remote_track(
        &self,
        _ctx: &SessionContext,
        _session_id: &SessionId,
        _track: &RemoteTrack,
    ) {
    }

    async fn on_assistant_command(
        &self,
        _ctx: &SessionContext,
        _session_id: &SessionId,
        _command: &AssistantCommand,
    ) {
    }

    /// Last call of a session. `error` is `None` after an explicit leave.
    async fn on_session_ended(&self, _ctx: &SessionContext, _error: Option<&SessionError>) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}
