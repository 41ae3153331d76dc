use async_trait::async_trait;
use colored::*;
use laplace::model::{AssistantCommand, RoomId, SessionId, Status};
use laplace::session::{RelayConfig, RemoteTrack, SessionContext, SessionError, SessionObserver};

/// Prints session progress to the terminal.
pub struct ConsoleObserver {
    config: RelayConfig,
}

impl ConsoleObserver {
    pub fn new(config: RelayConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SessionObserver for ConsoleObserver {
    async fn on_room_ready(&self, _ctx: &SessionContext, room_id: &RoomId) {
        println!("{} {}", "Room:".bold(), room_id.to_string().cyan().bold());
        if let Ok(url) = self.config.join_url(room_id) {
            println!("{} {}", "Join:".bold(), url.as_str().underline());
        }
    }

    async fn on_link_added(&self, _ctx: &SessionContext, session_id: &SessionId) {
        println!("{} {}", "+".green(), session_id.label());
    }

    async fn on_link_connected(&self, _ctx: &SessionContext, session_id: &SessionId) {
        println!("{} {} connected", "✓".green(), session_id.label());
    }

    async fn on_link_removed(&self, _ctx: &SessionContext, session_id: &SessionId) {
        println!("{} {}", "-".red(), session_id.label());
    }

    async fn on_status(&self, ctx: &SessionContext, status: &Status) {
        let peers = if ctx.own_session().is_some() {
            ctx.display_peers()
        } else {
            status.peers.clone()
        };
        println!(
            "{} {} [{}]",
            "Connected:".bold(),
            status.num_conn,
            peers.join(", ")
        );
    }

    async fn on_latency(&self, _ctx: &SessionContext, session_id: &SessionId, millis: u64) {
        println!("{} {} ms ({})", "Latency:".dimmed(), millis, session_id.label());
    }

    async fn on_remote_track(
        &self,
        _ctx: &SessionContext,
        _session_id: &SessionId,
        track: &RemoteTrack,
    ) {
        println!("{} {} track {}", "Receiving".cyan(), track.kind, track.id);
    }

    async fn on_assistant_command(
        &self,
        _ctx: &SessionContext,
        session_id: &SessionId,
        command: &AssistantCommand,
    ) {
        match command {
            AssistantCommand::RequestClick { message } => {
                println!(
                    "{} {}: {}",
                    "Click requested by".yellow().bold(),
                    session_id.label(),
                    message
                );
            }
        }
    }

    async fn on_session_ended(&self, _ctx: &SessionContext, error: Option<&SessionError>) {
        if let Some(e) = error {
            println!("{}", e.user_message().red());
        }
    }
}
