use crate::link::{Heartbeat, IceState, LatencyProbe, LinkEvent, LinkState};
use crate::media::LocalStream;
use crate::signaling::SignalingOutput;
use crate::transport::PeerTransport;
use anyhow::{Result, bail};
use laplace_core::{
    AssistantCommand, ChannelMessage, IceCandidate, ProtocolError, Role, SessionDescription,
    SessionId, SignalMessage, Status,
};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// What a heartbeat channel message meant for the owning session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelInput {
    /// A ping was answered.
    Pinged,
    /// A pong completed a round trip; carries the new average.
    Latency(u64),
    Status(Status),
    Assistant(AssistantCommand),
}

/// One peer connection and heartbeat channel bound to one `sessionID`.
pub struct PeerLink {
    session_id: SessionId,
    role: Role,
    state: LinkState,
    transport: Box<dyn PeerTransport>,
    /// Local candidates gathered before the offer/answer went out.
    pending_local: Vec<IceCandidate>,
    /// Remote candidates received before the remote description was set.
    pending_remote: Vec<IceCandidate>,
    heartbeat: Option<Heartbeat>,
    latency: LatencyProbe,
}

impl PeerLink {
    pub fn new(session_id: SessionId, role: Role, transport: Box<dyn PeerTransport>) -> Self {
        Self {
            session_id,
            role,
            state: LinkState::Created,
            transport,
            pending_local: Vec::new(),
            pending_remote: Vec::new(),
            heartbeat: None,
            latency: LatencyProbe::new(),
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn latency(&self) -> u64 {
        self.latency.average()
    }

    pub fn has_heartbeat(&self) -> bool {
        self.heartbeat.as_ref().is_some_and(Heartbeat::is_active)
    }

    pub fn pending_remote(&self) -> usize {
        self.pending_remote.len()
    }

    fn transition(&mut self, next: LinkState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            bail!(
                "link {:?} cannot move from {} to {}",
                self.session_id,
                self.state,
                next
            );
        }
        debug!("Link {:?}: {} -> {}", self.session_id, self.state, next);
        self.state = next;
        Ok(())
    }

    /// Sharer side: heartbeat channel, shared tracks, offer.
    pub async fn start_offer(
        &mut self,
        stream: &LocalStream,
        signaling: &dyn SignalingOutput,
    ) -> Result<()> {
        if self.state != LinkState::Created {
            bail!("offer already started for {:?}", self.session_id);
        }
        self.transport.open_heartbeat_channel().await?;
        self.transport.add_stream(stream).await?;
        let offer = self.transport.create_offer().await?;

        signaling
            .send(SignalMessage::GotOffer {
                session_id: self.session_id.clone(),
                offer,
            })
            .await;
        self.transition(LinkState::OfferSent)?;
        self.flush_local(signaling).await;
        Ok(())
    }

    /// Viewer side: apply the offer, answer it. A later offer on an
    /// established link renegotiates without changing state.
    pub async fn accept_offer(
        &mut self,
        offer: SessionDescription,
        signaling: &dyn SignalingOutput,
    ) -> Result<()> {
        let fresh = match self.state {
            LinkState::Created => true,
            LinkState::AnswerExchanged | LinkState::Connected => false,
            other => bail!("unexpected offer for {:?} in state {}", self.session_id, other),
        };
        self.transport.set_remote_description(offer).await?;
        if fresh {
            self.transition(LinkState::OfferReceived)?;
            self.flush_remote().await;
        } else {
            debug!("Renegotiating link {:?}", self.session_id);
        }

        let answer = self.transport.create_answer().await?;
        signaling
            .send(SignalMessage::GotAnswer {
                session_id: self.session_id.clone(),
                answer,
            })
            .await;
        if fresh {
            self.transition(LinkState::AnswerExchanged)?;
            self.flush_local(signaling).await;
        }
        Ok(())
    }

    /// Sharer side: the viewer's answer completes negotiation.
    pub async fn accept_answer(&mut self, answer: SessionDescription) -> Result<()> {
        if self.state != LinkState::OfferSent {
            bail!(
                "unexpected answer for {:?} in state {}",
                self.session_id,
                self.state
            );
        }
        self.transport.set_remote_description(answer).await?;
        self.transition(LinkState::AnswerExchanged)?;
        self.flush_remote().await;
        Ok(())
    }

    fn candidate_message(&self, candidate: IceCandidate) -> SignalMessage {
        let session_id = self.session_id.clone();
        match self.role {
            Role::Serve => SignalMessage::CallerIceCandidate {
                session_id,
                candidate,
            },
            Role::Connect => SignalMessage::CalleeIceCandidate {
                session_id,
                candidate,
            },
        }
    }

    /// Trickles a locally gathered candidate, or holds it until this link's
    /// offer/answer has been sent.
    pub async fn local_candidate(&mut self, candidate: IceCandidate, signaling: &dyn SignalingOutput) {
        if self.state.is_terminal() {
            return;
        }
        if !self.state.can_send_candidates() {
            self.pending_local.push(candidate);
            return;
        }
        signaling.send(self.candidate_message(candidate)).await;
    }

    async fn flush_local(&mut self, signaling: &dyn SignalingOutput) {
        for candidate in std::mem::take(&mut self.pending_local) {
            signaling.send(self.candidate_message(candidate)).await;
        }
    }

    /// Applies a remote candidate, or holds it until the remote description
    /// is set.
    pub async fn remote_candidate(&mut self, candidate: IceCandidate) {
        if self.state.is_terminal() {
            return;
        }
        if !self.state.has_remote_description() {
            debug!("Queueing remote candidate for {:?}", self.session_id);
            self.pending_remote.push(candidate);
            return;
        }
        if let Err(e) = self.transport.add_ice_candidate(candidate).await {
            warn!("Failed to add ICE candidate for {:?}: {:?}", self.session_id, e);
        }
    }

    async fn flush_remote(&mut self) {
        for candidate in std::mem::take(&mut self.pending_remote) {
            if let Err(e) = self.transport.add_ice_candidate(candidate).await {
                warn!("Failed to add ICE candidate for {:?}: {:?}", self.session_id, e);
            }
        }
    }

    /// Returns `true` when the link must be torn down.
    pub fn on_ice_state(&mut self, ice: IceState) -> bool {
        if ice.is_down() {
            return true;
        }
        if ice.is_connected() && self.state != LinkState::Connected {
            if let Err(e) = self.transition(LinkState::Connected) {
                warn!("{}", e);
            } else {
                info!("Link {:?} connected", self.session_id);
            }
        }
        false
    }

    /// Starts the heartbeat once the data channel is open.
    pub fn channel_opened(&mut self, period: Duration, events: mpsc::Sender<LinkEvent>) {
        if self.state.is_terminal() || self.has_heartbeat() {
            return;
        }
        self.heartbeat = Some(Heartbeat::start(self.session_id.clone(), period, events));
    }

    pub fn channel_closed(&mut self) {
        if let Some(mut heartbeat) = self.heartbeat.take() {
            heartbeat.cancel();
        }
    }

    pub async fn send(&self, message: &ChannelMessage) -> Result<()> {
        self.transport.send_text(message.to_string()).await
    }

    pub async fn send_ping(&self, now_ms: u64) -> Result<()> {
        self.send(&ChannelMessage::Ping(now_ms)).await
    }

    /// Interprets one heartbeat channel message. Pings are answered here.
    pub async fn handle_channel_text(
        &mut self,
        text: &str,
        now_ms: u64,
    ) -> Result<ChannelInput, ProtocolError> {
        let message: ChannelMessage = text.parse()?;

        Ok(match message {
            ChannelMessage::Ping(_) => {
                if let Some(reply) = message.reply() {
                    if let Err(e) = self.send(&reply).await {
                        warn!("Failed to answer ping on {:?}: {:?}", self.session_id, e);
                    }
                }
                ChannelInput::Pinged
            }
            ChannelMessage::Pong(sent_at) => {
                ChannelInput::Latency(self.latency.record_pong(sent_at, now_ms))
            }
            ChannelMessage::Status(status) => ChannelInput::Status(status),
            ChannelMessage::Assistant(command) => ChannelInput::Assistant(command),
        })
    }

    /// Cancels the heartbeat and closes the connection. Safe to repeat.
    pub async fn close(&mut self) {
        self.channel_closed();
        if self.state.is_terminal() {
            return;
        }
        self.state = LinkState::Disconnected;
        self.pending_local.clear();
        self.pending_remote.clear();
        if let Err(e) = self.transport.close().await {
            warn!("Failed to close connection for {:?}: {:?}", self.session_id, e);
        }
        info!("Link {:?} closed", self.session_id);
    }
}
