mod endpoint;
mod signaling_connector;
mod signaling_output;
mod ws_signaling;

pub use endpoint::Endpoint;
pub use signaling_connector::{SignalingConnector, SignalingEvent, SignalingLink};
pub use signaling_output::SignalingOutput;
pub use ws_signaling::{WsOutput, WsSignaling};
