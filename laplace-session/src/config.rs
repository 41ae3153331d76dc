use crate::error::SessionError;
use crate::transport::TransportConfig;
use laplace_core::utils::{ICE_CANDIDATE_POOL_SIZE, SHARER_HEARTBEAT_MS, VIEWER_HEARTBEAT_MS};
use laplace_core::{CapturePreset, IceSettings, RoomId};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Client configuration shared by both roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Signaling server, `ws://` or `wss://`. `http(s)` is rewritten.
    pub signaling_url: String,
    /// Public origin used in join links. Falls back to the signaling host.
    #[serde(alias = "BASE_URL")]
    pub base_url: String,
    #[serde(flatten)]
    pub ice: IceSettings,
    pub preset: CapturePreset,
    pub sharer_heartbeat_ms: u64,
    pub viewer_heartbeat_ms: u64,
    pub ice_candidate_pool_size: u8,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            signaling_url: "ws://127.0.0.1:8080".to_owned(),
            base_url: String::new(),
            ice: IceSettings::default(),
            preset: CapturePreset::default(),
            sharer_heartbeat_ms: SHARER_HEARTBEAT_MS,
            viewer_heartbeat_ms: VIEWER_HEARTBEAT_MS,
            ice_candidate_pool_size: ICE_CANDIDATE_POOL_SIZE,
        }
    }
}

impl RelayConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, SessionError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| SessionError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SessionError> {
        self.signaling_base()?;
        if self.sharer_heartbeat_ms == 0 || self.viewer_heartbeat_ms == 0 {
            return Err(SessionError::Config(
                "heartbeat interval must be positive".to_owned(),
            ));
        }
        Ok(())
    }

    /// ICE servers and pool size for a peer connection opened under `preset`.
    pub fn transport_config(&self, preset: CapturePreset) -> TransportConfig {
        TransportConfig {
            ice_servers: self.ice.servers_for(preset.ice_policy()),
            ice_candidate_pool_size: self.ice_candidate_pool_size,
        }
    }

    pub fn sharer_heartbeat(&self) -> Duration {
        Duration::from_millis(self.sharer_heartbeat_ms)
    }

    pub fn viewer_heartbeat(&self) -> Duration {
        Duration::from_millis(self.viewer_heartbeat_ms)
    }

    /// Signaling URL normalised to a websocket scheme.
    pub fn signaling_base(&self) -> Result<Url, SessionError> {
        let mut url = Url::parse(&self.signaling_url)
            .map_err(|e| SessionError::Config(format!("signaling_url: {}", e)))?;
        let scheme = match url.scheme() {
            "ws" | "http" => "ws",
            "wss" | "https" => "wss",
            other => {
                return Err(SessionError::Config(format!(
                    "unsupported signaling scheme '{}'",
                    other
                )));
            }
        };
        if url.scheme() != scheme {
            // Only fails for cannot-be-a-base urls, which were rejected above.
            let _ = url.set_scheme(scheme);
        }
        Ok(url)
    }

    /// Link a viewer opens to join `room`: `<base>/view?room=<id>`.
    pub fn join_url(&self, room: &RoomId) -> Result<Url, SessionError> {
        let mut base = if self.base_url.trim().is_empty() {
            let mut url = self.signaling_base()?;
            let scheme = if url.scheme() == "wss" { "https" } else { "http" };
            let _ = url.set_scheme(scheme);
            url
        } else {
            Url::parse(self.base_url.trim())
                .map_err(|e| SessionError::Config(format!("base_url: {}", e)))?
        };
        base.set_query(None);
        let path = format!("{}/view", base.path().trim_end_matches('/'));
        base.set_path(&path);
        base.query_pairs_mut().append_pair("room", room.as_str());
        Ok(base)
    }
}
