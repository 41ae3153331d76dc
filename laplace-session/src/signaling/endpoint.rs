use laplace_core::{Role, RoomId};
use url::Url;

/// Where a participant attaches on the signaling server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Sharer; `claim` is a pre-issued room token.
    Serve { claim: Option<String> },
    /// Viewer joining `room`.
    Connect { room: RoomId },
}

impl Endpoint {
    pub fn role(&self) -> Role {
        match self {
            Endpoint::Serve { .. } => Role::Serve,
            Endpoint::Connect { .. } => Role::Connect,
        }
    }

    /// `<base>/ws/serve[?claim=..]` or `<base>/ws/connect?room=..`.
    pub fn url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        url.set_query(None);
        let path = format!(
            "{}/ws/{}",
            base.path().trim_end_matches('/'),
            self.role().endpoint()
        );
        url.set_path(&path);

        match self {
            Endpoint::Serve { claim: Some(claim) } if !claim.is_empty() => {
                url.query_pairs_mut().append_pair("claim", claim);
            }
            Endpoint::Serve { .. } => {}
            Endpoint::Connect { room } => {
                url.query_pairs_mut().append_pair("room", room.as_str());
            }
        }
        url
    }
}
