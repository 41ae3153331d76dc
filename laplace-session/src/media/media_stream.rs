use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;
use webrtc::rtp_transceiver::rtp_codec::RTPCodecType;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;
use webrtc::track::track_remote::TrackRemote;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackKind {
    Audio,
    Video,
}

impl TrackKind {
    pub fn codec_type(&self) -> RTPCodecType {
        match self {
            TrackKind::Audio => RTPCodecType::Audio,
            TrackKind::Video => RTPCodecType::Video,
        }
    }

    pub fn from_codec_type(kind: RTPCodecType) -> Option<Self> {
        match kind {
            RTPCodecType::Audio => Some(TrackKind::Audio),
            RTPCodecType::Video => Some(TrackKind::Video),
            _ => None,
        }
    }
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackKind::Audio => f.write_str("audio"),
            TrackKind::Video => f.write_str("video"),
        }
    }
}

#[derive(Clone)]
pub struct LocalTrack {
    pub kind: TrackKind,
    pub track: Arc<TrackLocalStaticSample>,
}

impl LocalTrack {
    pub fn id(&self) -> &str {
        self.track.id()
    }
}

impl fmt::Debug for LocalTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalTrack")
            .field("kind", &self.kind)
            .field("id", &self.id())
            .finish()
    }
}

/// The sharer's single captured stream. Every link attaches the same tracks.
#[derive(Debug)]
pub struct LocalStream {
    id: String,
    tracks: Vec<LocalTrack>,
    live: AtomicBool,
}

impl LocalStream {
    pub fn new(id: impl Into<String>, tracks: Vec<LocalTrack>) -> Self {
        Self {
            id: id.into(),
            tracks,
            live: AtomicBool::new(true),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tracks(&self) -> &[LocalTrack] {
        &self.tracks
    }

    pub fn has_kind(&self, kind: TrackKind) -> bool {
        self.tracks.iter().any(|t| t.kind == kind)
    }

    /// Stops every track. Sample writers should check [`LocalStream::is_live`].
    pub fn stop(&self) {
        if self.live.swap(false, Ordering::SeqCst) {
            info!("Local stream {} stopped ({} tracks)", self.id, self.tracks.len());
        }
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }
}

/// A track received from the remote side.
#[derive(Clone)]
pub struct RemoteTrack {
    pub id: String,
    pub stream_id: String,
    pub kind: TrackKind,
    /// RTP source, absent for tracks reported by non-WebRTC transports.
    pub handle: Option<Arc<TrackRemote>>,
}

impl fmt::Debug for RemoteTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteTrack")
            .field("id", &self.id)
            .field("stream_id", &self.stream_id)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Viewer-side stream. Tracks accumulate across renegotiations and are never
/// replaced, so the displayed video never blanks.
#[derive(Debug, Clone, Default)]
pub struct RemoteStream {
    tracks: Vec<RemoteTrack>,
}

impl RemoteStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `track` unless a track with the same id is already present.
    pub fn add(&mut self, track: RemoteTrack) -> bool {
        if self.tracks.iter().any(|t| t.id == track.id) {
            return false;
        }
        self.tracks.push(track);
        true
    }

    pub fn tracks(&self) -> &[RemoteTrack] {
        &self.tracks
    }

    pub fn has_kind(&self, kind: TrackKind) -> bool {
        self.tracks.iter().any(|t| t.kind == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
