use thiserror::Error;

/// Failures while decoding signaling envelopes or heartbeat channel text.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown message type '{0}'")]
    UnknownType(String),

    #[error("'{kind}' message is missing field {field}")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },

    #[error("invalid '{kind}' payload: {source}")]
    Payload {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("unrecognised channel message '{0}'")]
    UnknownChannelMessage(String),

    #[error("invalid timestamp in '{0}'")]
    Timestamp(String),
}
