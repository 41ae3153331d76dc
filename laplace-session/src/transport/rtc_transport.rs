use crate::link::{IceState, LinkEvent};
use crate::media::{LocalStream, RemoteTrack, TrackKind};
use crate::transport::{PeerConnector, PeerTransport, TransportConfig};
use anyhow::{Context, Result};
use async_trait::async_trait;
use laplace_core::utils::HEARTBEAT_CHANNEL_LABEL;
use laplace_core::{IceCandidate, SessionDescription, SessionId};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::data_channel::RTCDataChannel;
use webrtc::data_channel::data_channel_message::DataChannelMessage;
use webrtc::ice_transport::ice_candidate::RTCIceCandidate;
use webrtc::ice_transport::ice_connection_state::RTCIceConnectionState;
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::RTCRtpTransceiverInit;
use webrtc::rtp_transceiver::rtp_codec::RTPCodecType;
use webrtc::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use webrtc::rtp_transceiver::rtp_transceiver_direction::RTCRtpTransceiverDirection;
use webrtc::rtp_transceiver::RTCRtpTransceiver;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_remote::TrackRemote;

type ChannelSlot = Arc<Mutex<Option<Arc<RTCDataChannel>>>>;

/// [`PeerTransport`] backed by a `webrtc` peer connection.
pub struct RtcTransport {
    pub session_id: SessionId,
    pub peer_connection: Arc<RTCPeerConnection>,
    channel: ChannelSlot,
    event_tx: mpsc::Sender<LinkEvent>,
}

impl RtcTransport {
    /// Creates the peer connection and wires its callbacks into `event_tx`.
    pub async fn new(
        session_id: SessionId,
        config: &TransportConfig,
        event_tx: mpsc::Sender<LinkEvent>,
    ) -> Result<Self> {
        // 1. Media engine and interceptors
        let mut m = MediaEngine::default();
        m.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut m)?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        // 2. Peer connection with the link's ICE servers
        let rtc_config = RTCConfiguration {
            ice_servers: config
                .ice_servers
                .iter()
                .cloned()
                .map(RTCIceServer::from)
                .collect(),
            ice_candidate_pool_size: config.ice_candidate_pool_size,
            ..Default::default()
        };

        let peer_connection = Arc::new(
            api.new_peer_connection(rtc_config)
                .await
                .context("Failed to create peer connection")?,
        );
        let channel: ChannelSlot = Arc::new(Mutex::new(None));

        // 3. ICE state and local candidates go to the session
        let state_tx = event_tx.clone();
        let sid_state = session_id.clone();
        peer_connection.on_ice_connection_state_change(Box::new(
            move |s: RTCIceConnectionState| {
                let tx = state_tx.clone();
                let sid = sid_state.clone();

                Box::pin(async move {
                    info!("ICE connection state for {:?}: {:?}", sid, s);
                    let _ = tx
                        .send(LinkEvent::IceStateChanged(sid, IceState::from(s)))
                        .await;
                })
            },
        ));

        let ice_tx = event_tx.clone();
        let sid_ice = session_id.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();
            let sid = sid_ice.clone();

            Box::pin(async move {
                let Some(candidate) = c else { return };
                let Ok(init) = candidate.to_json() else {
                    return;
                };
                let _ = tx
                    .send(LinkEvent::CandidateGenerated(sid, IceCandidate::from(init)))
                    .await;
            })
        }));

        // 4. Viewer side: the heartbeat channel is announced by the sharer
        let dc_tx = event_tx.clone();
        let sid_dc = session_id.clone();
        let dc_slot = channel.clone();
        peer_connection.on_data_channel(Box::new(move |dc: Arc<RTCDataChannel>| {
            let tx = dc_tx.clone();
            let sid = sid_dc.clone();
            let slot = dc_slot.clone();

            Box::pin(async move {
                debug!("Data channel '{}' received for {:?}", dc.label(), sid);
                if dc.label() != HEARTBEAT_CHANNEL_LABEL {
                    warn!("Ignoring unexpected data channel '{}'", dc.label());
                    return;
                }
                wire_channel(sid, &dc, tx);
                *slot.lock().await = Some(dc);
            })
        }));

        // 5. Remote media
        let track_tx = event_tx.clone();
        let sid_track = session_id.clone();
        peer_connection.on_track(Box::new(
            move |track: Arc<TrackRemote>,
                  _receiver: Arc<RTCRtpReceiver>,
                  _transceiver: Arc<RTCRtpTransceiver>| {
                let tx = track_tx.clone();
                let sid = sid_track.clone();

                Box::pin(async move {
                    let Some(kind) = TrackKind::from_codec_type(track.kind()) else {
                        return;
                    };
                    let remote = RemoteTrack {
                        id: track.id(),
                        stream_id: track.stream_id(),
                        kind,
                        handle: Some(track),
                    };
                    info!("Remote {} track {} for {:?}", kind, remote.id, sid);
                    let _ = tx.send(LinkEvent::RemoteTrack(sid, remote)).await;
                })
            },
        ));

        Ok(Self {
            session_id,
            peer_connection,
            channel,
            event_tx,
        })
    }
}

/// Forwards open/message/close of the heartbeat channel as link events.
fn wire_channel(session_id: SessionId, dc: &Arc<RTCDataChannel>, tx: mpsc::Sender<LinkEvent>) {
    let tx_open = tx.clone();
    let sid_open = session_id.clone();
    dc.on_open(Box::new(move || {
        let tx = tx_open.clone();
        let sid = sid_open.clone();

        Box::pin(async move {
            info!("Heartbeat channel open for {:?}", sid);
            let _ = tx.send(LinkEvent::ChannelOpen(sid)).await;
        })
    }));

    let tx_msg = tx.clone();
    let sid_msg = session_id.clone();
    dc.on_message(Box::new(move |msg: DataChannelMessage| {
        let tx = tx_msg.clone();
        let sid = sid_msg.clone();

        Box::pin(async move {
            let _ = tx.send(LinkEvent::ChannelMessage(sid, msg.data)).await;
        })
    }));

    let sid_close = session_id;
    dc.on_close(Box::new(move || {
        let tx = tx.clone();
        let sid = sid_close.clone();

        Box::pin(async move {
            debug!("Heartbeat channel closed for {:?}", sid);
            let _ = tx.send(LinkEvent::ChannelClosed(sid)).await;
        })
    }));
}

#[async_trait]
impl PeerTransport for RtcTransport {
    async fn open_heartbeat_channel(&self) -> Result<()> {
        let dc = self
            .peer_connection
            .create_data_channel(HEARTBEAT_CHANNEL_LABEL, None)
            .await
            .context("Failed to create heartbeat channel")?;
        wire_channel(self.session_id.clone(), &dc, self.event_tx.clone());
        *self.channel.lock().await = Some(dc);
        Ok(())
    }

    async fn add_stream(&self, stream: &LocalStream) -> Result<()> {
        for local in stream.tracks() {
            let sender = self
                .peer_connection
                .add_track(Arc::clone(&local.track) as Arc<dyn TrackLocal + Send + Sync>)
                .await
                .with_context(|| format!("Failed to add {} track", local.kind))?;

            // RTCP has to be drained for the interceptors to work.
            tokio::spawn(async move {
                let mut rtcp_buf = vec![0u8; 1500];
                while sender.read(&mut rtcp_buf).await.is_ok() {}
            });
        }
        Ok(())
    }

    async fn create_offer(&self) -> Result<SessionDescription> {
        let transceivers = self.peer_connection.get_transceivers().await;
        for kind in [RTPCodecType::Audio, RTPCodecType::Video] {
            if transceivers.iter().any(|t| t.kind() == kind) {
                continue;
            }
            self.peer_connection
                .add_transceiver_from_kind(
                    kind,
                    Some(RTCRtpTransceiverInit {
                        direction: RTCRtpTransceiverDirection::Recvonly,
                        send_encodings: vec![],
                    }),
                )
                .await?;
        }

        let offer = self.peer_connection.create_offer(None).await?;
        self.peer_connection
            .set_local_description(offer.clone())
            .await?;
        Ok(SessionDescription::try_from(&offer)?)
    }

    async fn create_answer(&self) -> Result<SessionDescription> {
        let answer = self.peer_connection.create_answer(None).await?;
        self.peer_connection
            .set_local_description(answer.clone())
            .await?;
        Ok(SessionDescription::try_from(&answer)?)
    }

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<()> {
        let desc = RTCSessionDescription::try_from(desc)?;
        self.peer_connection.set_remote_description(desc).await?;
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()> {
        self.peer_connection
            .add_ice_candidate(candidate.into())
            .await
            .context("Failed to add ICE candidate")?;
        Ok(())
    }

    async fn send_text(&self, text: String) -> Result<()> {
        let channel = self.channel.lock().await.clone();
        let channel = channel.context("Heartbeat channel not established")?;
        channel.send_text(text).await?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        if let Some(channel) = self.channel.lock().await.take() {
            let _ = channel.close().await;
        }
        self.peer_connection.close().await?;
        Ok(())
    }
}

/// Opens [`RtcTransport`]s.
#[derive(Debug, Clone, Default)]
pub struct RtcConnector;

#[async_trait]
impl PeerConnector for RtcConnector {
    async fn connect(
        &self,
        session_id: SessionId,
        config: &TransportConfig,
        events: mpsc::Sender<LinkEvent>,
    ) -> Result<Box<dyn PeerTransport>> {
        let transport = RtcTransport::new(session_id, config, events).await?;
        Ok(Box::new(transport))
    }
}
