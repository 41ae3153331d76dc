pub const DEFAULT_STUN_ADDR: &str = "stun:stun1.l.google.com:19302";
pub const DEFAULT_STUN_ADDR_2: &str = "stun:stun2.l.google.com:19302";

/// Number of ICE candidates gathered ahead of negotiation on every link.
pub const ICE_CANDIDATE_POOL_SIZE: u8 = 10;

/// Heartbeat cadence of each sharer-side link.
pub const SHARER_HEARTBEAT_MS: u64 = 5000;

/// Heartbeat cadence of the viewer's single link.
pub const VIEWER_HEARTBEAT_MS: u64 = 1000;

/// Label of the data channel carrying heartbeats and status.
pub const HEARTBEAT_CHANNEL_LABEL: &str = "ping";

pub fn default_stun_urls() -> Vec<String> {
    vec![DEFAULT_STUN_ADDR.to_owned(), DEFAULT_STUN_ADDR_2.to_owned()]
}
