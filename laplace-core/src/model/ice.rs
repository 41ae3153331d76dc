use crate::utils::default_stun_urls;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

impl IceServerConfig {
    pub fn stun(urls: Vec<String>) -> Self {
        Self {
            urls,
            username: None,
            credential: None,
        }
    }
}

/// Whether a preset reaches out to STUN/TURN servers or stays on the LAN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IcePolicy {
    Stun,
    LanOnly,
}

/// Externally supplied ICE server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IceSettings {
    #[serde(alias = "STUN_URLS")]
    pub stun_urls: Vec<String>,
    #[serde(alias = "TURN_URLS")]
    pub turn_urls: Vec<String>,
    #[serde(alias = "TURN_USER")]
    pub turn_user: String,
    #[serde(alias = "TURN_PASS")]
    pub turn_pass: String,
}

impl Default for IceSettings {
    fn default() -> Self {
        Self {
            stun_urls: default_stun_urls(),
            turn_urls: Vec::new(),
            turn_user: String::new(),
            turn_pass: String::new(),
        }
    }
}

impl IceSettings {
    /// Server list for the given policy. TURN is appended only when URLs are
    /// configured.
    pub fn servers_for(&self, policy: IcePolicy) -> Vec<IceServerConfig> {
        if policy == IcePolicy::LanOnly {
            return Vec::new();
        }

        let stun_urls = if self.stun_urls.is_empty() {
            default_stun_urls()
        } else {
            self.stun_urls.clone()
        };
        let mut servers = vec![IceServerConfig::stun(stun_urls)];

        if !self.turn_urls.is_empty() {
            servers.push(IceServerConfig {
                urls: self.turn_urls.clone(),
                username: Some(self.turn_user.clone()),
                credential: Some(self.turn_pass.clone()),
            });
        }
        servers
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<IceServerConfig> for webrtc::ice_transport::ice_server::RTCIceServer {
    fn from(server: IceServerConfig) -> Self {
        Self {
            urls: server.urls,
            username: server.username.unwrap_or_default(),
            credential: server.credential.unwrap_or_default(),
            ..Default::default()
        }
    }
}
