use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier the signaling server assigns to one viewer's relationship
/// with a room. Sharers key their links by it.
#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq, PartialOrd, Ord)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human readable peer label: the segment after the room prefix
    /// (`ROOM$label`), or the whole identifier when there is no prefix.
    pub fn label(&self) -> &str {
        self.0.split('$').nth(1).unwrap_or(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
