use async_trait::async_trait;
use laplace_core::{AssistantCommand, RoomId, SessionId, Status};
use laplace_session::{Clock, RemoteTrack, SessionContext, SessionError, SessionObserver};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

/// Event types recorded by TestObserver.
#[derive(Debug, Clone, PartialEq)]
pub enum ObservedEvent {
    RoomReady(RoomId),
    LinkAdded(SessionId),
    LinkConnected(SessionId),
    LinkRemoved(SessionId),
    Status(Status),
    Latency(SessionId, u64),
    RemoteTrack(SessionId, String),
    Assistant(SessionId, AssistantCommand),
    /// Carries the error text, `None` after an explicit leave.
    Ended(Option<String>),
}

/// A SessionObserver that records every callback.
#[derive(Clone, Default)]
pub struct TestObserver {
    events: Arc<Mutex<Vec<ObservedEvent>>>,
}

impl TestObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_events(&self) -> Vec<ObservedEvent> {
        self.events.lock().await.clone()
    }

    /// Wait for an event matching `pred` with timeout.
    pub async fn wait_for<F>(&self, pred: F, timeout_ms: u64) -> bool
    where
        F: Fn(&ObservedEvent) -> bool,
    {
        let start = tokio::time::Instant::now();
        let timeout = std::time::Duration::from_millis(timeout_ms);

        loop {
            if self.events.lock().await.iter().any(|e| pred(e)) {
                return true;
            }
            if start.elapsed() > timeout {
                return false;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    }

    /// The most recent status reported.
    pub async fn last_status(&self) -> Option<Status> {
        self.events.lock().await.iter().rev().find_map(|e| match e {
            ObservedEvent::Status(s) => Some(s.clone()),
            _ => None,
        })
    }

    pub async fn has_removed(&self, session_id: &str) -> bool {
        let id = SessionId::from(session_id);
        self.events
            .lock()
            .await
            .iter()
            .any(|e| matches!(e, ObservedEvent::LinkRemoved(s) if *s == id))
    }

    async fn push(&self, event: ObservedEvent) {
        tracing::info!("[TestObserver] {:?}", event);
        self.events.lock().await.push(event);
    }
}

#[async_trait]
impl SessionObserver for TestObserver {
    async fn on_room_ready(&self, _ctx: &SessionContext, room_id: &RoomId) {
        self.push(ObservedEvent::RoomReady(room_id.clone())).await;
    }

    async fn on_link_added(&self, _ctx: &SessionContext, session_id: &SessionId) {
        self.push(ObservedEvent::LinkAdded(session_id.clone())).await;
    }

    async fn on_link_connected(&self, _ctx: &SessionContext, session_id: &SessionId) {
        self.push(ObservedEvent::LinkConnected(session_id.clone())).await;
    }

    async fn on_link_removed(&self, _ctx: &SessionContext, session_id: &SessionId) {
        self.push(ObservedEvent::LinkRemoved(session_id.clone())).await;
    }

    async fn on_status(&self, _ctx: &SessionContext, status: &Status) {
        self.push(ObservedEvent::Status(status.clone())).await;
    }

    async fn on_latency(&self, _ctx: &SessionContext, session_id: &SessionId, millis: u64) {
        self.push(ObservedEvent::Latency(session_id.clone(), millis))
            .await;
    }

    async fn on_remote_track(
        &self,
        _ctx: &SessionContext,
        session_id: &SessionId,
        track: &RemoteTrack,
    ) {
        self.push(ObservedEvent::RemoteTrack(session_id.clone(), track.id.clone()))
            .await;
    }

    async fn on_assistant_command(
        &self,
        _ctx: &SessionContext,
        session_id: &SessionId,
        command: &AssistantCommand,
    ) {
        self.push(ObservedEvent::Assistant(session_id.clone(), command.clone()))
            .await;
    }

    async fn on_session_ended(&self, _ctx: &SessionContext, error: Option<&SessionError>) {
        self.push(ObservedEvent::Ended(error.map(|e| e.to_string())))
            .await;
    }
}

/// Clock the test moves by hand.
#[derive(Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn at(millis: u64) -> Self {
        let clock = Self::default();
        clock.set(millis);
        clock
    }

    pub fn set(&self, millis: u64) {
        self.now.store(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}
