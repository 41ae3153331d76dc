mod peer_transport;
mod rtc_transport;
mod transport_config;

pub use peer_transport::{PeerConnector, PeerTransport};
pub use rtc_transport::{RtcConnector, RtcTransport};
pub use transport_config::TransportConfig;
