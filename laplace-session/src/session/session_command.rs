/// Commands from the UI layer to a running session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Explicit user exit: stop tracks, close every link and the signaling channel.
    Leave,

    /// Viewer (agent) asks the sharer to click somewhere.
    RequestClick { message: String },
}
