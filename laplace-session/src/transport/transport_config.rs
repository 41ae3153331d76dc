use laplace_core::IceServerConfig;
use laplace_core::utils::{ICE_CANDIDATE_POOL_SIZE, default_stun_urls};

/// Peer connection parameters for one link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    pub ice_servers: Vec<IceServerConfig>,
    pub ice_candidate_pool_size: u8,
}

impl TransportConfig {
    /// No ICE servers: host candidates only.
    pub fn lan_only() -> Self {
        Self {
            ice_servers: Vec::new(),
            ..Default::default()
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec![IceServerConfig::stun(default_stun_urls())],
            ice_candidate_pool_size: ICE_CANDIDATE_POOL_SIZE,
        }
    }
}
