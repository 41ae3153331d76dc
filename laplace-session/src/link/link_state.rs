use std::fmt;

/// Lifecycle of one peer link.
///
/// `Created → OfferSent (sharer) | OfferReceived (viewer) → AnswerExchanged
/// → Connected → Disconnected`. `Disconnected` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkState {
    Created,
    OfferSent,
    OfferReceived,
    AnswerExchanged,
    Connected,
    Disconnected,
}

impl LinkState {
    /// Local candidates may only go out once this link's sessionID has been
    /// put on the wire with an offer or answer.
    pub fn can_send_candidates(&self) -> bool {
        matches!(
            self,
            LinkState::OfferSent | LinkState::AnswerExchanged | LinkState::Connected
        )
    }

    pub fn has_remote_description(&self) -> bool {
        matches!(
            self,
            LinkState::OfferReceived | LinkState::AnswerExchanged | LinkState::Connected
        )
    }

    pub fn is_terminal(&self) -> bool {
        *self == LinkState::Disconnected
    }

    /// Whether `next` is a legal successor of this state.
    pub fn can_transition_to(&self, next: LinkState) -> bool {
        use LinkState::*;
        match (self, next) {
            (Disconnected, _) => false,
            (_, Disconnected) => true,
            (Created, OfferSent) | (Created, OfferReceived) => true,
            (OfferSent, AnswerExchanged) | (OfferReceived, AnswerExchanged) => true,
            // ICE may report connectivity before the answer round-trip is
            // observed locally on the answering side.
            (OfferSent, Connected) | (AnswerExchanged, Connected) => true,
            _ => false,
        }
    }
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LinkState::Created => "CREATED",
            LinkState::OfferSent => "OFFER_SENT",
            LinkState::OfferReceived => "OFFER_RECEIVED",
            LinkState::AnswerExchanged => "ANSWER_EXCHANGED",
            LinkState::Connected => "CONNECTED",
            LinkState::Disconnected => "DISCONNECTED",
        };
        f.write_str(s)
    }
}
