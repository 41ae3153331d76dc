use laplace_core::{SessionDescription, SessionId, SignalMessage};
use laplace_session::TrackKind;

use crate::integration::init_tracing;
use crate::utils::{ObservedEvent, SIGNAL_TIMEOUT_MS, is_answer_for, start_test_viewer, wait_until};

#[tokio::test]
async fn test_viewer_accumulates_tracks() {
    init_tracing();

    let session = start_test_viewer("R").await.expect("start");
    session
        .server
        .deliver(SignalMessage::GotOffer {
            session_id: SessionId::from("R$v"),
            offer: SessionDescription::offer("v=0"),
        })
        .await;
    session
        .server
        .output
        .wait_for(is_answer_for("R$v"), SIGNAL_TIMEOUT_MS)
        .await
        .expect("no answer");
    let peer = session.peers.peer("R$v").await.expect("peer");

    peer.remote_track("video-1", TrackKind::Video).await;
    peer.remote_track("audio-1", TrackKind::Audio).await;
    peer.remote_track("video-1", TrackKind::Video).await;

    let ctx = session.handle.context().clone();
    assert!(wait_until(|| ctx.remote_stream().tracks().len() == 2, SIGNAL_TIMEOUT_MS).await);
    let stream = ctx.remote_stream();
    assert!(stream.has_kind(TrackKind::Video));
    assert!(stream.has_kind(TrackKind::Audio));

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    let announced = session
        .observer
        .get_events()
        .await
        .into_iter()
        .filter(|e| matches!(e, ObservedEvent::RemoteTrack(..)))
        .count();
    assert_eq!(announced, 2);

    session.handle.leave().await;
}
