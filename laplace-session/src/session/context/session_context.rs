use crate::link::LinkState;
use crate::media::RemoteStream;
use dashmap::DashMap;
use laplace_core::{RoomId, SessionId, Status};
use std::sync::Arc;
use tokio::sync::watch;

/// Live view of one link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkInfo {
    pub state: LinkState,
    /// Average round trip in ms, 0 until the first pong.
    pub latency: u64,
}

/// Read side of a running session, shared with observers and the UI.
/// Cheap to clone and safe to read from any task.
#[derive(Clone)]
pub struct SessionContext {
    links: Arc<DashMap<SessionId, LinkInfo>>,
    room: Arc<watch::Sender<Option<RoomId>>>,
    own_session: Arc<watch::Sender<Option<SessionId>>>,
    status: Arc<watch::Sender<Status>>,
    remote_stream: Arc<watch::Sender<RemoteStream>>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            links: Arc::new(DashMap::new()),
            room: Arc::new(watch::Sender::new(None)),
            own_session: Arc::new(watch::Sender::new(None)),
            status: Arc::new(watch::Sender::new(Status::default())),
            remote_stream: Arc::new(watch::Sender::new(RemoteStream::new())),
        }
    }

    pub fn room_id(&self) -> Option<RoomId> {
        self.room.borrow().clone()
    }

    /// The viewer's own sessionID, once assigned.
    pub fn own_session(&self) -> Option<SessionId> {
        self.own_session.borrow().clone()
    }

    pub fn list_links(&self) -> Vec<SessionId> {
        let mut ids: Vec<SessionId> = self.links.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn contains_link(&self, session_id: &SessionId) -> bool {
        self.links.contains_key(session_id)
    }

    pub fn link(&self, session_id: &SessionId) -> Option<LinkInfo> {
        self.links.get(session_id).map(|e| *e.value())
    }

    pub fn status(&self) -> Status {
        self.status.borrow().clone()
    }

    pub fn watch_status(&self) -> watch::Receiver<Status> {
        self.status.subscribe()
    }

    /// Peer labels as shown to a viewer, its own label marked.
    pub fn display_peers(&self) -> Vec<String> {
        let own = self.own_session();
        self.status()
            .display_peers(own.as_ref().map(|id| id.label()))
    }

    pub fn remote_stream(&self) -> RemoteStream {
        self.remote_stream.borrow().clone()
    }

    pub(crate) fn set_room(&self, room: RoomId) {
        self.room.send_replace(Some(room));
    }

    pub(crate) fn set_own_session(&self, session_id: Option<SessionId>) {
        self.own_session.send_replace(session_id);
    }

    pub(crate) fn upsert_link(&self, session_id: &SessionId, state: LinkState) {
        self.links
            .entry(session_id.clone())
            .and_modify(|info| info.state = state)
            .or_insert(LinkInfo { state, latency: 0 });
    }

    pub(crate) fn set_latency(&self, session_id: &SessionId, latency: u64) {
        if let Some(mut info) = self.links.get_mut(session_id) {
            info.latency = latency;
        }
    }

    pub(crate) fn remove_link(&self, session_id: &SessionId) {
        self.links.remove(session_id);
    }

    pub(crate) fn clear_links(&self) {
        self.links.clear();
    }

    pub(crate) fn set_status(&self, status: Status) {
        self.status.send_replace(status);
    }

    pub(crate) fn set_remote_stream(&self, stream: RemoteStream) {
        self.remote_stream.send_replace(stream);
    }
}
