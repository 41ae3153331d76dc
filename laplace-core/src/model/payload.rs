use serde::{Deserialize, Serialize};

/// Kind of an SDP session description, serialized the way browsers do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SdpType {
    Offer,
    Pranswer,
    Answer,
    Rollback,
}

/// `RTCSessionDescriptionInit`-shaped payload carried in `gotOffer`/`gotAnswer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescription {
    #[serde(rename = "type")]
    pub sdp_type: SdpType,
    pub sdp: String,
}

impl SessionDescription {
    pub fn offer(sdp: impl Into<String>) -> Self {
        Self {
            sdp_type: SdpType::Offer,
            sdp: sdp.into(),
        }
    }

    pub fn answer(sdp: impl Into<String>) -> Self {
        Self {
            sdp_type: SdpType::Answer,
            sdp: sdp.into(),
        }
    }
}

/// `RTCIceCandidateInit`-shaped payload carried in the ICE trickle messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidate {
    pub candidate: String,
    #[serde(default)]
    pub sdp_mid: Option<String>,
    #[serde(default)]
    pub sdp_m_line_index: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username_fragment: Option<String>,
}

#[cfg(not(target_arch = "wasm32"))]
mod rtc {
    use super::{IceCandidate, SdpType, SessionDescription};
    use webrtc::ice_transport::ice_candidate::RTCIceCandidateInit;
    use webrtc::peer_connection::sdp::sdp_type::RTCSdpType;
    use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;

    impl From<IceCandidate> for RTCIceCandidateInit {
        fn from(c: IceCandidate) -> Self {
            RTCIceCandidateInit {
                candidate: c.candidate,
                sdp_mid: c.sdp_mid,
                sdp_mline_index: c.sdp_m_line_index,
                username_fragment: c.username_fragment,
            }
        }
    }

    impl From<RTCIceCandidateInit> for IceCandidate {
        fn from(c: RTCIceCandidateInit) -> Self {
            IceCandidate {
                candidate: c.candidate,
                sdp_mid: c.sdp_mid,
                sdp_m_line_index: c.sdp_mline_index,
                username_fragment: c.username_fragment,
            }
        }
    }

    impl TryFrom<SessionDescription> for RTCSessionDescription {
        type Error = webrtc::Error;

        fn try_from(d: SessionDescription) -> Result<Self, Self::Error> {
            match d.sdp_type {
                SdpType::Offer => RTCSessionDescription::offer(d.sdp),
                SdpType::Answer => RTCSessionDescription::answer(d.sdp),
                SdpType::Pranswer => RTCSessionDescription::pranswer(d.sdp),
                SdpType::Rollback => Err(webrtc::Error::new(
                    "rollback descriptions are not supported".to_owned(),
                )),
            }
        }
    }

    impl TryFrom<&RTCSessionDescription> for SessionDescription {
        type Error = webrtc::Error;

        fn try_from(d: &RTCSessionDescription) -> Result<Self, Self::Error> {
            let sdp_type = match d.sdp_type {
                RTCSdpType::Offer => SdpType::Offer,
                RTCSdpType::Answer => SdpType::Answer,
                RTCSdpType::Pranswer => SdpType::Pranswer,
                RTCSdpType::Rollback => SdpType::Rollback,
                RTCSdpType::Unspecified => {
                    return Err(webrtc::Error::new(
                        "session description has no type".to_owned(),
                    ));
                }
            };
            Ok(SessionDescription {
                sdp_type,
                sdp: d.sdp.clone(),
            })
        }
    }
}
