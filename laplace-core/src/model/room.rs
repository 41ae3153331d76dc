use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-issued room identifier. Opaque to the client.
#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        // Room codes are often pasted with a leading '#'.
        Self(s.trim().trim_start_matches('#').to_owned())
    }
}

impl From<String> for RoomId {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which side of a room a participant is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Sharer: exposes the captured stream to every viewer.
    Serve,
    /// Viewer: receives the sharer's stream over a single link.
    Connect,
}

impl Role {
    /// Path segment of the signaling endpoint for this role.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Role::Serve => "serve",
            Role::Connect => "connect",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}
