use crate::error::SessionError;
use crate::session::{SessionCommand, SessionContext};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Handle to a running sharer or viewer session.
pub struct SessionHandle {
    command_tx: mpsc::Sender<SessionCommand>,
    context: SessionContext,
    task: JoinHandle<Result<(), SessionError>>,
}

impl SessionHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<SessionCommand>,
        context: SessionContext,
        task: JoinHandle<Result<(), SessionError>>,
    ) -> Self {
        Self {
            command_tx,
            context,
            task,
        }
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    async fn command(&self, cmd: SessionCommand) -> Result<(), SessionError> {
        debug!("Session command {:?}", cmd);
        self.command_tx
            .send(cmd)
            .await
            .map_err(|_| SessionError::Ended)
    }

    /// Ends the session. Leaving a finished session is a no-op.
    pub async fn leave(&self) {
        let _ = self.command(SessionCommand::Leave).await;
    }

    /// Viewer only: asks the sharer to click, shown with `message`.
    pub async fn request_click(&self, message: impl Into<String>) -> Result<(), SessionError> {
        self.command(SessionCommand::RequestClick {
            message: message.into(),
        })
        .await
    }

    /// Waits for the session to end and returns why it ended.
    pub async fn join(self) -> Result<(), SessionError> {
        let SessionHandle {
            command_tx, task, ..
        } = self;
        let result = task
            .await
            .map_err(|e| SessionError::Task(e.to_string()))?;
        drop(command_tx);
        result
    }
}
