use crate::config::RelayConfig;
use crate::error::SessionError;
use crate::link::{ChannelInput, LinkEvent, LinkState, PeerLink};
use crate::media::RemoteStream;
use crate::session::{SessionCommand, SessionContext, SessionDeps, SessionHandle};
use crate::signaling::{Endpoint, SignalingEvent, SignalingOutput};
use crate::transport::TransportConfig;
use laplace_core::{
    AssistantCommand, ChannelMessage, IceCandidate, Role, RoomId, SessionDescription, SessionId,
    SignalMessage,
};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Session manager of the viewing side: zero or one link to the sharer.
pub struct ViewerSession {
    config: RelayConfig,
    transport_config: TransportConfig,
    /// sessionID the current link slot is bound to.
    tracked: Option<SessionId>,
    link: Option<PeerLink>,
    /// Ids whose link was torn down. Room-scoped and never pruned.
    retired: HashSet<SessionId>,
    remote_stream: RemoteStream,
    signaling: Arc<dyn SignalingOutput>,
    signal_rx: mpsc::Receiver<SignalingEvent>,
    command_rx: mpsc::Receiver<SessionCommand>,
    link_rx: mpsc::Receiver<LinkEvent>,
    link_tx: mpsc::Sender<LinkEvent>,
    deps: SessionDeps,
    ctx: SessionContext,
}

impl ViewerSession {
    pub async fn start(
        config: RelayConfig,
        room: RoomId,
        deps: SessionDeps,
    ) -> Result<SessionHandle, SessionError> {
        config.validate()?;
        if room.as_str().is_empty() {
            return Err(SessionError::Config("room code is empty".to_owned()));
        }

        let link = deps
            .signaling
            .open(&Endpoint::Connect { room: room.clone() })
            .await?;

        let ctx = SessionContext::new();
        ctx.set_room(room);

        let (command_tx, command_rx) = mpsc::channel(32);
        let (link_tx, link_rx) = mpsc::channel(256);

        let session = Self {
            transport_config: config.transport_config(config.preset),
            config,
            tracked: None,
            link: None,
            retired: HashSet::new(),
            remote_stream: RemoteStream::new(),
            signaling: link.output,
            signal_rx: link.events,
            command_rx,
            link_rx,
            link_tx,
            deps,
            ctx: ctx.clone(),
        };

        let task = tokio::spawn(session.run());
        Ok(SessionHandle::new(command_tx, ctx, task))
    }

    pub async fn run(mut self) -> Result<(), SessionError> {
        info!("Viewer session started");

        if let Some(room) = self.ctx.room_id() {
            self.deps.observer.on_room_ready(&self.ctx, &room).await;
        }

        let result = loop {
            tokio::select! {
                evt = self.signal_rx.recv() => {
                    match evt {
                        Some(SignalingEvent::Message(msg)) => {
                            if let Err(e) = self.handle_signal(msg).await {
                                break Err(e);
                            }
                        }
                        Some(SignalingEvent::Closed(reason)) => {
                            break Err(SessionError::Transport(
                                reason.unwrap_or_else(|| "signaling closed".to_owned()),
                            ));
                        }
                        None => {
                            break Err(SessionError::Transport("signaling channel dropped".to_owned()));
                        }
                    }
                }

                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(SessionCommand::Leave) | None => {
                            info!("Viewer leaving session");
                            break Ok(());
                        }
                        Some(SessionCommand::RequestClick { message }) => {
                            self.request_click(message).await;
                        }
                    }
                }

                Some(evt) = self.link_rx.recv() => {
                    self.handle_link_event(evt).await;
                }
            }
        };

        if let Err(e) = &result {
            error!("Viewer session ended: {}", e);
        }
        self.shutdown(result.as_ref().err()).await;
        info!("Viewer session finished");
        result
    }

    fn is_tracked(&self, session_id: &SessionId) -> bool {
        self.tracked.as_ref() == Some(session_id)
    }

    async fn handle_signal(&mut self, msg: SignalMessage) -> Result<(), SessionError> {
        match msg {
            SignalMessage::NewSession { session_id } => {
                if self.tracked.is_some() || self.retired.contains(&session_id) {
                    debug!("Ignoring newSession {:?}", session_id);
                    return Ok(());
                }
                self.bind(session_id).await;
            }

            SignalMessage::GotOffer { session_id, offer } => {
                self.on_offer(session_id, offer).await;
            }

            SignalMessage::CallerIceCandidate {
                session_id,
                candidate,
            } => {
                self.on_remote_candidate(&session_id, candidate).await;
            }

            SignalMessage::RoomNotFound => return Err(SessionError::RoomNotFound),
            SignalMessage::RoomClosed => return Err(SessionError::RoomClosed),

            other => debug!("Viewer ignores {}", other.kind()),
        }
        Ok(())
    }

    /// Binds the link slot to `session_id` and creates its link.
    async fn bind(&mut self, session_id: SessionId) {
        info!("Assigned session {:?}", session_id);
        self.tracked = Some(session_id.clone());
        self.ctx.set_own_session(Some(session_id.clone()));

        match self
            .deps
            .peers
            .connect(session_id.clone(), &self.transport_config, self.link_tx.clone())
            .await
        {
            Ok(transport) => {
                self.link = Some(PeerLink::new(session_id.clone(), Role::Connect, transport));
                self.ctx.upsert_link(&session_id, LinkState::Created);
                self.deps.observer.on_link_added(&self.ctx, &session_id).await;
            }
            Err(e) => {
                error!("Failed to create transport for {:?}: {:?}", session_id, e);
                self.unbind().await;
            }
        }
    }

    async fn on_offer(&mut self, session_id: SessionId, offer: SessionDescription) {
        if self.retired.contains(&session_id) {
            debug!("Offer for retired session {:?}", session_id);
            return;
        }
        if self.tracked.is_none() {
            self.bind(session_id.clone()).await;
        }
        if !self.is_tracked(&session_id) {
            debug!("Offer for foreign session {:?}", session_id);
            return;
        }
        let Some(link) = self.link.as_mut() else {
            return;
        };

        match link.accept_offer(offer, self.signaling.as_ref()).await {
            Ok(()) => self.ctx.upsert_link(&session_id, link.state()),
            Err(e) => {
                warn!("Negotiation failed for {:?}: {:?}", session_id, e);
                self.teardown().await;
            }
        }
    }

    async fn on_remote_candidate(&mut self, session_id: &SessionId, candidate: IceCandidate) {
        if !self.is_tracked(session_id) {
            return;
        }
        if let Some(link) = self.link.as_mut() {
            link.remote_candidate(candidate).await;
        }
    }

    async fn request_click(&mut self, message: String) {
        let Some(link) = self.link.as_ref().filter(|l| l.has_heartbeat()) else {
            warn!("No open link to the sharer, click request dropped");
            return;
        };
        let command = ChannelMessage::Assistant(AssistantCommand::RequestClick { message });
        if let Err(e) = link.send(&command).await {
            warn!("Failed to send click request: {:?}", e);
        }
    }

    /// Closes the link and frees the slot; the old sessionID stays retired.
    async fn teardown(&mut self) {
        if let Some(mut link) = self.link.take() {
            link.close().await;
        }
        self.unbind().await;
    }

    async fn unbind(&mut self) {
        let Some(session_id) = self.tracked.take() else {
            return;
        };
        self.retired.insert(session_id.clone());
        self.ctx.set_own_session(None);
        if self.ctx.contains_link(&session_id) {
            self.ctx.remove_link(&session_id);
            self.deps.observer.on_link_removed(&self.ctx, &session_id).await;
        }
    }

    async fn handle_link_event(&mut self, event: LinkEvent) {
        let session_id = event.session_id().clone();
        if !self.is_tracked(&session_id) {
            debug!("Dropping event for stale link {:?}", session_id);
            return;
        }
        let Some(link) = self.link.as_mut() else {
            return;
        };

        match event {
            LinkEvent::CandidateGenerated(_, candidate) => {
                link.local_candidate(candidate, self.signaling.as_ref()).await;
            }

            LinkEvent::IceStateChanged(_, ice) => {
                let before = link.state();
                if link.on_ice_state(ice) {
                    info!("Link to sharer went {:?}", ice);
                    self.teardown().await;
                } else if link.state() != before {
                    self.ctx.upsert_link(&session_id, link.state());
                    if link.state() == LinkState::Connected {
                        self.deps
                            .observer
                            .on_link_connected(&self.ctx, &session_id)
                            .await;
                    }
                }
            }

            LinkEvent::ChannelOpen(_) => {
                link.channel_opened(self.config.viewer_heartbeat(), self.link_tx.clone());
            }

            LinkEvent::ChannelMessage(_, data) => {
                let Ok(text) = std::str::from_utf8(&data) else {
                    warn!("Non-text heartbeat message from sharer");
                    return;
                };
                let now = self.deps.clock.now_millis();
                match link.handle_channel_text(text, now).await {
                    Ok(ChannelInput::Latency(ms)) => {
                        self.ctx.set_latency(&session_id, ms);
                        self.deps.observer.on_latency(&self.ctx, &session_id, ms).await;
                    }
                    Ok(ChannelInput::Status(status)) => {
                        debug!("Sharer status: {} connected", status.num_conn);
                        self.ctx.set_status(status.clone());
                        self.deps.observer.on_status(&self.ctx, &status).await;
                    }
                    Ok(ChannelInput::Pinged) => {}
                    Ok(ChannelInput::Assistant(_)) => {
                        debug!("Viewer ignores assistant commands");
                    }
                    Err(e) => warn!("Dropping heartbeat message: {}", e),
                }
            }

            LinkEvent::ChannelClosed(_) => link.channel_closed(),

            LinkEvent::RemoteTrack(_, track) => {
                if self.remote_stream.add(track.clone()) {
                    self.ctx.set_remote_stream(self.remote_stream.clone());
                    self.deps
                        .observer
                        .on_remote_track(&self.ctx, &session_id, &track)
                        .await;
                }
            }

            LinkEvent::HeartbeatDue(_) => {
                let now = self.deps.clock.now_millis();
                if let Err(e) = link.send_ping(now).await {
                    warn!("Ping failed: {:?}", e);
                }
            }
        }
    }

    async fn shutdown(&mut self, error: Option<&SessionError>) {
        self.teardown().await;
        self.ctx.clear_links();
        self.signaling.close().await;
        self.deps.observer.on_session_ended(&self.ctx, error).await;
    }
}
