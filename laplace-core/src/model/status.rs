use crate::model::session::SessionId;
use serde::{Deserialize, Serialize};

/// Sharer-side aggregate of connected peers, rebroadcast to every viewer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub num_conn: usize,
    #[serde(default)]
    pub peers: Vec<String>,
}

impl Status {
    /// Builds the status from the live link keys. Labels are sorted so every
    /// viewer sees the same order.
    pub fn from_sessions<'a, I>(sessions: I) -> Self
    where
        I: IntoIterator<Item = &'a SessionId>,
    {
        let mut peers: Vec<String> = sessions
            .into_iter()
            .map(|id| id.label().to_owned())
            .collect();
        peers.sort();

        Self {
            num_conn: peers.len(),
            peers,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.num_conn == 0
    }

    /// Peer list as a viewer displays it, marking its own label.
    pub fn display_peers(&self, own_label: Option<&str>) -> Vec<String> {
        self.peers
            .iter()
            .map(|peer| match own_label {
                Some(own) if own == peer => format!("{} (you)", peer),
                _ => peer.clone(),
            })
            .collect()
    }
}
