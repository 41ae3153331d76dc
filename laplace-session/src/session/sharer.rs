use crate::config::RelayConfig;
use crate::error::SessionError;
use crate::link::{ChannelInput, LinkEvent, LinkState, PeerLink};
use crate::media::LocalStream;
use crate::session::{SessionCommand, SessionContext, SessionDeps, SessionHandle};
use crate::signaling::{Endpoint, SignalingEvent, SignalingOutput};
use crate::transport::TransportConfig;
use laplace_core::{CapturePreset, ChannelMessage, Role, RoomId, SessionId, SignalMessage, Status};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Session manager of the sharing side: one captured stream fanned out to a
/// link per connected viewer.
pub struct SharerSession {
    config: RelayConfig,
    transport_config: TransportConfig,
    stream: Arc<LocalStream>,
    links: HashMap<SessionId, PeerLink>,
    /// Sessions already torn down; never recreated. Lives as long as the
    /// room, so it only grows.
    retired: HashSet<SessionId>,
    signaling: Arc<dyn SignalingOutput>,
    signal_rx: mpsc::Receiver<SignalingEvent>,
    command_rx: mpsc::Receiver<SessionCommand>,
    link_rx: mpsc::Receiver<LinkEvent>,
    link_tx: mpsc::Sender<LinkEvent>,
    deps: SessionDeps,
    ctx: SessionContext,
}

impl SharerSession {
    /// Captures, opens signaling and spawns the session.
    ///
    /// A capture failure returns before any signaling state exists.
    pub async fn start(
        config: RelayConfig,
        preset: CapturePreset,
        claim: Option<String>,
        deps: SessionDeps,
    ) -> Result<SessionHandle, SessionError> {
        let (session, command_tx) = Self::prepare(config, preset, claim, deps).await?;
        let ctx = session.ctx.clone();
        let task = tokio::spawn(session.run());
        Ok(SessionHandle::new(command_tx, ctx, task))
    }

    async fn prepare(
        config: RelayConfig,
        preset: CapturePreset,
        claim: Option<String>,
        deps: SessionDeps,
    ) -> Result<(Self, mpsc::Sender<SessionCommand>), SessionError> {
        config.validate()?;

        let stream = match deps.capture.capture(&preset.constraints()).await {
            Ok(stream) => stream,
            Err(e) => {
                warn!("Capture failed for preset {}: {}", preset, e);
                return Err(e.into());
            }
        };

        let claim = claim.filter(|c| !c.trim().is_empty());
        let endpoint = Endpoint::Serve {
            claim: claim.clone(),
        };
        let link = match deps.signaling.open(&endpoint).await {
            Ok(link) => link,
            Err(e) => {
                stream.stop();
                return Err(e);
            }
        };

        let ctx = SessionContext::new();
        if let Some(claim) = claim {
            ctx.set_room(RoomId::from(claim));
        }

        let (command_tx, command_rx) = mpsc::channel(32);
        let (link_tx, link_rx) = mpsc::channel(256);

        let session = Self {
            transport_config: config.transport_config(preset),
            config,
            stream,
            links: HashMap::new(),
            retired: HashSet::new(),
            signaling: link.output,
            signal_rx: link.events,
            command_rx,
            link_rx,
            link_tx,
            deps,
            ctx,
        };
        Ok((session, command_tx))
    }

    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    pub async fn run(mut self) -> Result<(), SessionError> {
        info!("Sharer session started");

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
                            info!("Sharer leaving session");
                            break Ok(());
                        }
                        Some(SessionCommand::RequestClick { .. }) => {
                            warn!("Click requests are sent by viewers, ignoring");
                        }
                    }
                }

                Some(evt) = self.link_rx.recv() => {
                    self.handle_link_event(evt).await;
                }
            }
        };

        if let Err(e) = &result {
            error!("Sharer session ended: {}", e);
        }
        self.shutdown(result.as_ref().err()).await;
        info!("Sharer session finished");
        result
    }

    async fn handle_signal(&mut self, msg: SignalMessage) -> Result<(), SessionError> {
        match msg {
            SignalMessage::NewRoom { room_id } => {
                info!("Room ready: {}", room_id);
                self.ctx.set_room(room_id.clone());
                self.deps.observer.on_room_ready(&self.ctx, &room_id).await;
            }

            SignalMessage::NewSession { session_id } => {
                if self.links.contains_key(&session_id) || self.retired.contains(&session_id) {
                    debug!("Ignoring repeated newSession {:?}", session_id);
                    return Ok(());
                }
                self.add_link(session_id).await;
            }

            SignalMessage::GotAnswer { session_id, answer } => {
                let Some(link) = self.links.get_mut(&session_id) else {
                    debug!("Answer for unknown session {:?}", session_id);
                    return Ok(());
                };
                if link.state() != LinkState::OfferSent {
                    debug!(
                        "Ignoring stale answer for {:?} in state {}",
                        session_id,
                        link.state()
                    );
                    return Ok(());
                }
                match link.accept_answer(answer).await {
                    Ok(()) => self.ctx.upsert_link(&session_id, link.state()),
                    Err(e) => {
                        warn!("Negotiation failed for {:?}: {:?}", session_id, e);
                        self.remove_link(&session_id).await;
                    }
                }
            }

            SignalMessage::CalleeIceCandidate {
                session_id,
                candidate,
            } => {
                if let Some(link) = self.links.get_mut(&session_id) {
                    link.remote_candidate(candidate).await;
                }
            }

            SignalMessage::RoomNotFound => return Err(SessionError::RoomNotFound),
            SignalMessage::RoomClosed => return Err(SessionError::RoomClosed),

            other => debug!("Sharer ignores {}", other.kind()),
        }
        Ok(())
    }

    async fn add_link(&mut self, session_id: SessionId) {
        info!("Viewer joined: {:?}", session_id);

        let transport = match self
            .deps
            .peers
            .connect(session_id.clone(), &self.transport_config, self.link_tx.clone())
            .await
        {
            Ok(transport) => transport,
            Err(e) => {
                error!("Failed to create transport for {:?}: {:?}", session_id, e);
                return;
            }
        };

        let mut link = PeerLink::new(session_id.clone(), Role::Serve, transport);
        self.ctx.upsert_link(&session_id, LinkState::Created);
        self.deps.observer.on_link_added(&self.ctx, &session_id).await;

        if let Err(e) = link.start_offer(&self.stream, self.signaling.as_ref()).await {
            warn!("Offer failed for {:?}: {:?}", session_id, e);
            link.close().await;
            self.retire(&session_id).await;
            return;
        }

        self.ctx.upsert_link(&session_id, link.state());
        self.links.insert(session_id, link);
        self.publish_status().await;
    }

    async fn remove_link(&mut self, session_id: &SessionId) {
        let Some(mut link) = self.links.remove(session_id) else {
            return;
        };
        link.close().await;
        self.retire(session_id).await;
        self.publish_status().await;
    }

    async fn retire(&mut self, session_id: &SessionId) {
        self.retired.insert(session_id.clone());
        self.ctx.remove_link(session_id);
        info!("Viewer removed: {:?}", session_id);
        self.deps.observer.on_link_removed(&self.ctx, session_id).await;
    }

    fn current_status(&self) -> Status {
        Status::from_sessions(self.links.keys())
    }

    /// Recomputes the status from the live links and pushes it to every
    /// viewer whose channel is open.
    async fn publish_status(&mut self) {
        let status = self.current_status();
        self.ctx.set_status(status.clone());
        self.deps.observer.on_status(&self.ctx, &status).await;

        let message = ChannelMessage::Status(status);
        for link in self.links.values().filter(|l| l.has_heartbeat()) {
            if let Err(e) = link.send(&message).await {
                warn!("Failed to send status to {:?}: {:?}", link.session_id(), e);
            }
        }
    }

    async fn handle_link_event(&mut self, event: LinkEvent) {
        let session_id = event.session_id().clone();
        let Some(link) = self.links.get_mut(&session_id) else {
            debug!("Dropping event for closed link {:?}", session_id);
            return;
        };

        match event {
            LinkEvent::CandidateGenerated(_, candidate) => {
                link.local_candidate(candidate, self.signaling.as_ref()).await;
            }

            LinkEvent::IceStateChanged(_, ice) => {
                let before = link.state();
                if link.on_ice_state(ice) {
                    info!("Link {:?} went {:?}", session_id, ice);
                    self.remove_link(&session_id).await;
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
                link.channel_opened(self.config.sharer_heartbeat(), self.link_tx.clone());
            }

            LinkEvent::ChannelMessage(_, data) => {
                let Ok(text) = std::str::from_utf8(&data) else {
                    warn!("Non-text heartbeat message from {:?}", session_id);
                    return;
                };
                let now = self.deps.clock.now_millis();
                match link.handle_channel_text(text, now).await {
                    Ok(ChannelInput::Latency(ms)) => {
                        self.ctx.set_latency(&session_id, ms);
                        self.deps.observer.on_latency(&self.ctx, &session_id, ms).await;
                    }
                    Ok(ChannelInput::Assistant(command)) => {
                        info!("Assistant command from {:?}: {:?}", session_id, command);
                        self.deps
                            .observer
                            .on_assistant_command(&self.ctx, &session_id, &command)
                            .await;
                    }
                    Ok(ChannelInput::Pinged) | Ok(ChannelInput::Status(_)) => {}
                    Err(e) => warn!("Dropping heartbeat message from {:?}: {}", session_id, e),
                }
            }

            LinkEvent::ChannelClosed(_) => link.channel_closed(),

            LinkEvent::RemoteTrack(_, track) => {
                debug!("Sharer ignores remote {} track from {:?}", track.kind, session_id);
            }

            LinkEvent::HeartbeatDue(_) => {
                let now = self.deps.clock.now_millis();
                if let Err(e) = link.send_ping(now).await {
                    warn!("Ping failed for {:?}: {:?}", session_id, e);
                }
                let status = Status::from_sessions(self.links.keys());
                if let Some(link) = self.links.get(&session_id) {
                    if let Err(e) = link.send(&ChannelMessage::Status(status)).await {
                        warn!("Failed to send status to {:?}: {:?}", session_id, e);
                    }
                }
            }
        }
    }

    /// Tears down every link, stops the capture and closes signaling.
    async fn shutdown(&mut self, error: Option<&SessionError>) {
        let links: Vec<PeerLink> = self.links.drain().map(|(_, link)| link).collect();
        for mut link in links {
            link.close().await;
        }
        self.ctx.clear_links();
        self.ctx.set_status(Status::default());
        self.stream.stop();
        self.signaling.close().await;
        self.deps.observer.on_session_ended(&self.ctx, error).await;
    }
}
