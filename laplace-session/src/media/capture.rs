use crate::error::CaptureError;
use crate::media::{LocalStream, LocalTrack, TrackKind};
use async_trait::async_trait;
use laplace_core::CaptureConstraints;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use webrtc::api::media_engine::{MIME_TYPE_OPUS, MIME_TYPE_VP8};
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;

/// The capture primitive: yields the sharer's local stream or fails.
/// The stream is shared by every link of the session.
#[async_trait]
pub trait CaptureSource: Send + Sync {
    async fn capture(
        &self,
        constraints: &CaptureConstraints,
    ) -> Result<Arc<LocalStream>, CaptureError>;
}

/// Creates sample-fed VP8 (and Opus, when audio is requested) tracks.
/// The embedding application writes encoded frames into them.
///
/// Height and frame rate are not enforced here: the embedder owns frame
/// pacing and must stop writing once [`LocalStream::is_live`] is false.
#[derive(Debug, Clone, Default)]
pub struct StaticCapture;

impl StaticCapture {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CaptureSource for StaticCapture {
    async fn capture(
        &self,
        constraints: &CaptureConstraints,
    ) -> Result<Arc<LocalStream>, CaptureError> {
        let stream_id = format!("laplace-{}", Uuid::new_v4());
        let mut tracks = Vec::with_capacity(2);

        let video = TrackLocalStaticSample::new(
            RTCRtpCodecCapability {
                mime_type: MIME_TYPE_VP8.to_owned(),
                clock_rate: 90_000,
                ..Default::default()
            },
            format!("video-{}", Uuid::new_v4()),
            stream_id.clone(),
        );
        tracks.push(LocalTrack {
            kind: TrackKind::Video,
            track: Arc::new(video),
        });

        if constraints.audio {
            let audio = TrackLocalStaticSample::new(
                RTCRtpCodecCapability {
                    mime_type: MIME_TYPE_OPUS.to_owned(),
                    clock_rate: 48_000,
                    channels: 2,
                    ..Default::default()
                },
                format!("audio-{}", Uuid::new_v4()),
                stream_id.clone(),
            );
            tracks.push(LocalTrack {
                kind: TrackKind::Audio,
                track: Arc::new(audio),
            });
        }

        info!(
            "Captured stream {} ({} tracks, video {:?})",
            stream_id,
            tracks.len(),
            constraints.video
        );
        Ok(Arc::new(LocalStream::new(stream_id, tracks)))
    }
}
