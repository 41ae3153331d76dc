use crate::error::ProtocolError;
use crate::model::payload::{IceCandidate, SessionDescription};
use crate::model::room::RoomId;
use crate::model::session::SessionId;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Raw JSON envelope exchanged with the signaling server.
///
/// `Value`, when present, is itself JSON text (an ICE candidate or a
/// session description) or a bare identifier (`newRoom`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(
        rename = "SessionID",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub session_id: Option<String>,
    #[serde(rename = "Value", default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Closed set of signaling message tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    NewRoom,
    NewSession,
    GotOffer,
    GotAnswer,
    AddCallerIceCandidate,
    AddCalleeIceCandidate,
    RoomNotFound,
    RoomClosed,
    Beat,
}

impl SignalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::NewRoom => "newRoom",
            SignalKind::NewSession => "newSession",
            SignalKind::GotOffer => "gotOffer",
            SignalKind::GotAnswer => "gotAnswer",
            SignalKind::AddCallerIceCandidate => "addCallerIceCandidate",
            SignalKind::AddCalleeIceCandidate => "addCalleeIceCandidate",
            SignalKind::RoomNotFound => "roomNotFound",
            SignalKind::RoomClosed => "roomClosed",
            SignalKind::Beat => "beat",
        }
    }
}

impl FromStr for SignalKind {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "newRoom" => SignalKind::NewRoom,
            "newSession" => SignalKind::NewSession,
            "gotOffer" => SignalKind::GotOffer,
            "gotAnswer" => SignalKind::GotAnswer,
            "addCallerIceCandidate" => SignalKind::AddCallerIceCandidate,
            "addCalleeIceCandidate" => SignalKind::AddCalleeIceCandidate,
            "roomNotFound" => SignalKind::RoomNotFound,
            "roomClosed" => SignalKind::RoomClosed,
            "beat" => SignalKind::Beat,
            other => return Err(ProtocolError::UnknownType(other.to_owned())),
        })
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed signaling message. "Caller" candidates originate at the sharer,
/// "callee" candidates at the viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalMessage {
    NewRoom {
        room_id: RoomId,
    },
    NewSession {
        session_id: SessionId,
    },
    GotOffer {
        session_id: SessionId,
        offer: SessionDescription,
    },
    GotAnswer {
        session_id: SessionId,
        answer: SessionDescription,
    },
    CallerIceCandidate {
        session_id: SessionId,
        candidate: IceCandidate,
    },
    CalleeIceCandidate {
        session_id: SessionId,
        candidate: IceCandidate,
    },
    RoomNotFound,
    RoomClosed,
    Beat,
}

impl SignalMessage {
    pub fn kind(&self) -> SignalKind {
        match self {
            SignalMessage::NewRoom { .. } => SignalKind::NewRoom,
            SignalMessage::NewSession { .. } => SignalKind::NewSession,
            SignalMessage::GotOffer { .. } => SignalKind::GotOffer,
            SignalMessage::GotAnswer { .. } => SignalKind::GotAnswer,
            SignalMessage::CallerIceCandidate { .. } => SignalKind::AddCallerIceCandidate,
            SignalMessage::CalleeIceCandidate { .. } => SignalKind::AddCalleeIceCandidate,
            SignalMessage::RoomNotFound => SignalKind::RoomNotFound,
            SignalMessage::RoomClosed => SignalKind::RoomClosed,
            SignalMessage::Beat => SignalKind::Beat,
        }
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        match self {
            SignalMessage::NewSession { session_id }
            | SignalMessage::GotOffer { session_id, .. }
            | SignalMessage::GotAnswer { session_id, .. }
            | SignalMessage::CallerIceCandidate { session_id, .. }
            | SignalMessage::CalleeIceCandidate { session_id, .. } => Some(session_id),
            _ => None,
        }
    }

    /// Parse one text frame from the signaling socket.
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        let envelope: Envelope = serde_json::from_str(text)?;
        Self::from_envelope(envelope)
    }

    /// Serialize into the text frame sent over the signaling socket.
    pub fn encode(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(&self.to_envelope()?)?)
    }

    pub fn from_envelope(envelope: Envelope) -> Result<Self, ProtocolError> {
        let kind: SignalKind = envelope.kind.parse()?;
        // The server fills absent fields with empty strings.
        let session_id = envelope.session_id.filter(|s| !s.is_empty());
        let value = envelope.value.filter(|v| !v.is_empty());

        let require_session = || {
            session_id
                .clone()
                .map(SessionId::from)
                .ok_or(ProtocolError::MissingField {
                    kind: kind.as_str(),
                    field: "SessionID",
                })
        };
        let require_value = || {
            value.clone().ok_or(ProtocolError::MissingField {
                kind: kind.as_str(),
                field: "Value",
            })
        };

        Ok(match kind {
            SignalKind::NewRoom => SignalMessage::NewRoom {
                room_id: RoomId::from(require_value()?),
            },
            SignalKind::NewSession => {
                // Older servers only set Value; newer ones set both.
                let id = session_id
                    .clone()
                    .or_else(|| value.clone())
                    .ok_or(ProtocolError::MissingField {
                        kind: kind.as_str(),
                        field: "SessionID",
                    })?;
                SignalMessage::NewSession {
                    session_id: SessionId::from(id),
                }
            }
            SignalKind::GotOffer => SignalMessage::GotOffer {
                session_id: require_session()?,
                offer: nested(kind, &require_value()?)?,
            },
            SignalKind::GotAnswer => SignalMessage::GotAnswer {
                session_id: require_session()?,
                answer: nested(kind, &require_value()?)?,
            },
            SignalKind::AddCallerIceCandidate => SignalMessage::CallerIceCandidate {
                session_id: require_session()?,
                candidate: nested(kind, &require_value()?)?,
            },
            SignalKind::AddCalleeIceCandidate => SignalMessage::CalleeIceCandidate {
                session_id: require_session()?,
                candidate: nested(kind, &require_value()?)?,
            },
            SignalKind::RoomNotFound => SignalMessage::RoomNotFound,
            SignalKind::RoomClosed => SignalMessage::RoomClosed,
            SignalKind::Beat => SignalMessage::Beat,
        })
    }

    pub fn to_envelope(&self) -> Result<Envelope, ProtocolError> {
        let kind = self.kind().as_str().to_owned();
        let session_id = self.session_id().map(|s| s.0.clone());

        let value = match self {
            SignalMessage::NewRoom { room_id } => Some(room_id.0.clone()),
            SignalMessage::NewSession { session_id } => Some(session_id.0.clone()),
            SignalMessage::GotOffer { offer: desc, .. }
            | SignalMessage::GotAnswer { answer: desc, .. } => Some(serde_json::to_string(desc)?),
            SignalMessage::CallerIceCandidate { candidate, .. }
            | SignalMessage::CalleeIceCandidate { candidate, .. } => {
                Some(serde_json::to_string(candidate)?)
            }
            SignalMessage::RoomNotFound | SignalMessage::RoomClosed | SignalMessage::Beat => None,
        };

        Ok(Envelope {
            kind,
            session_id,
            value,
        })
    }
}

fn nested<T: DeserializeOwned>(kind: SignalKind, value: &str) -> Result<T, ProtocolError> {
    serde_json::from_str(value).map_err(|source| ProtocolError::Payload {
        kind: kind.as_str(),
        source,
    })
}
