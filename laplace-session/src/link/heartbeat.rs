use crate::link::LinkEvent;
use laplace_core::SessionId;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Interval timer owned by exactly one link.
///
/// Posts [`LinkEvent::HeartbeatDue`] to the session's event queue on every
/// tick. Cancelling more than once is a no-op, and dropping the handle
/// cancels it.
#[derive(Debug)]
pub struct Heartbeat {
    session_id: SessionId,
    task: Option<JoinHandle<()>>,
}

impl Heartbeat {
    pub fn start(
        session_id: SessionId,
        period: Duration,
        events: mpsc::Sender<LinkEvent>,
    ) -> Self {
        let sid = session_id.clone();
        let first = tokio::time::Instant::now() + period;
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(first, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if events.send(LinkEvent::HeartbeatDue(sid.clone())).await.is_err() {
                    break;
                }
            }
        });

        debug!("Heartbeat started for {:?} every {:?}", session_id, period);
        Self {
            session_id,
            task: Some(task),
        }
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Heartbeat cancelled for {:?}", self.session_id);
        }
    }

    pub fn is_active(&self) -> bool {
        self.task.is_some()
    }
}

impl Drop for Heartbeat {
    fn drop(&mut self) {
        self.cancel();
    }
}
