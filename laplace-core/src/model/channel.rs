use crate::error::ProtocolError;
use crate::model::status::Status;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const PING_PREFIX: &str = "ping ";
const PONG_PREFIX: &str = "pong ";
const STATUS_PREFIX: &str = "status ";
const ASSISTANT_PREFIX: &str = "assistant:";

/// Command an agent sends to the sharer over the heartbeat channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AssistantCommand {
    RequestClick { message: String },
}

/// Text messages carried on the heartbeat data channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelMessage {
    /// Sender's wall clock in milliseconds.
    Ping(u64),
    /// Echo of the ping timestamp.
    Pong(u64),
    Status(Status),
    Assistant(AssistantCommand),
}

impl ChannelMessage {
    /// The reply a responder owes for this message, if any.
    pub fn reply(&self) -> Option<ChannelMessage> {
        match self {
            ChannelMessage::Ping(ts) => Some(ChannelMessage::Pong(*ts)),
            _ => None,
        }
    }
}

fn timestamp(text: &str, rest: &str) -> Result<u64, ProtocolError> {
    rest.trim()
        .parse()
        .map_err(|_| ProtocolError::Timestamp(text.to_owned()))
}

impl FromStr for ChannelMessage {
    type Err = ProtocolError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if let Some(rest) = text.strip_prefix(PING_PREFIX) {
            return Ok(ChannelMessage::Ping(timestamp(text, rest)?));
        }
        if let Some(rest) = text.strip_prefix(PONG_PREFIX) {
            return Ok(ChannelMessage::Pong(timestamp(text, rest)?));
        }
        if let Some(rest) = text.strip_prefix(STATUS_PREFIX) {
            return Ok(ChannelMessage::Status(serde_json::from_str(rest)?));
        }
        if let Some(rest) = text.strip_prefix(ASSISTANT_PREFIX) {
            return Ok(ChannelMessage::Assistant(serde_json::from_str(rest)?));
        }
        Err(ProtocolError::UnknownChannelMessage(text.to_owned()))
    }
}

impl fmt::Display for ChannelMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelMessage::Ping(ts) => write!(f, "{}{}", PING_PREFIX, ts),
            ChannelMessage::Pong(ts) => write!(f, "{}{}", PONG_PREFIX, ts),
            ChannelMessage::Status(status) => {
                let json = serde_json::to_string(status).map_err(|_| fmt::Error)?;
                write!(f, "{}{}", STATUS_PREFIX, json)
            }
            ChannelMessage::Assistant(cmd) => {
                let json = serde_json::to_string(cmd).map_err(|_| fmt::Error)?;
                write!(f, "{}{}", ASSISTANT_PREFIX, json)
            }
        }
    }
}
