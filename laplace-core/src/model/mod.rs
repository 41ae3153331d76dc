mod channel;
mod ice;
mod payload;
mod preset;
mod room;
mod session;
mod signaling;
mod status;

pub use channel::{AssistantCommand, ChannelMessage};
pub use ice::{IcePolicy, IceServerConfig, IceSettings};
pub use payload::{IceCandidate, SdpType, SessionDescription};
pub use preset::{CaptureConstraints, CapturePreset, VideoConstraints};
pub use room::{Role, RoomId};
pub use session::SessionId;
pub use signaling::{Envelope, SignalKind, SignalMessage};
pub use status::Status;
