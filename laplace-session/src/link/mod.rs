mod heartbeat;
mod latency;
mod link_event;
mod link_state;
mod peer_link;

pub use heartbeat::Heartbeat;
pub use latency::{LATENCY_HISTORY, LatencyProbe};
pub use link_event::{IceState, LinkEvent};
pub use link_state::LinkState;
pub use peer_link::{ChannelInput, PeerLink};
