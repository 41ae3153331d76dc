use laplace_core::{SessionDescription, SessionId, SignalMessage};
use laplace_session::LinkState;

use crate::integration::init_tracing;
use crate::utils::{
    SIGNAL_TIMEOUT_MS, candidate, is_answer_for, is_callee_candidate_for, is_offer_for,
    start_test_sharer, start_test_viewer, wait_until,
};

#[tokio::test]
async fn test_sharer_queues_remote_candidates_until_answer() {
    init_tracing();

    let session = start_test_sharer(Some("ROOM7")).await.expect("start");
    let sid = SessionId::from("ROOM7$calm-heron");

    session
        .server
        .deliver(SignalMessage::NewSession {
            session_id: sid.clone(),
        })
        .await;
    session
        .server
        .output
        .wait_for(is_offer_for("ROOM7$calm-heron"), SIGNAL_TIMEOUT_MS)
        .await
        .expect("no offer");
    let peer = session.peers.peer("ROOM7$calm-heron").await.expect("peer");

    // Candidate arrives before the answer
    session
        .server
        .deliver(SignalMessage::CalleeIceCandidate {
            session_id: sid.clone(),
            candidate: candidate(3),
        })
        .await;
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert!(peer.record().await.remote_candidates.is_empty());

    session
        .server
        .deliver(SignalMessage::GotAnswer {
            session_id: sid.clone(),
            answer: SessionDescription::answer("v=0 late"),
        })
        .await;

    let ctx = session.handle.context().clone();
    assert!(
        wait_until(
            || ctx.link(&sid).map(|l| l.state) == Some(LinkState::AnswerExchanged),
            SIGNAL_TIMEOUT_MS
        )
        .await
    );
    assert_eq!(peer.record().await.remote_candidates, vec![candidate(3)]);

    session.handle.leave().await;
}

#[tokio::test]
async fn test_viewer_queues_candidates_until_offer() {
    init_tracing();

    let session = start_test_viewer("ROOM7").await.expect("start");
    let sid = SessionId::from("ROOM7$S1");

    session
        .server
        .deliver(SignalMessage::NewSession {
            session_id: sid.clone(),
        })
        .await;
    let peer = session
        .peers
        .wait_for_peer("ROOM7$S1", SIGNAL_TIMEOUT_MS)
        .await
        .expect("viewer did not create a link");

    // Local candidate gathered and a remote one received before any offer
    peer.gather(candidate(1)).await;
    session
        .server
        .deliver(SignalMessage::CallerIceCandidate {
            session_id: sid.clone(),
            candidate: candidate(2),
        })
        .await;
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert_eq!(
        session
            .server
            .output
            .count(is_callee_candidate_for("ROOM7$S1"))
            .await,
        0
    );
    assert!(peer.record().await.remote_candidates.is_empty());

    session
        .server
        .deliver(SignalMessage::GotOffer {
            session_id: sid.clone(),
            offer: SessionDescription::offer("v=0 sharer"),
        })
        .await;

    session
        .server
        .output
        .wait_for(is_callee_candidate_for("ROOM7$S1"), SIGNAL_TIMEOUT_MS)
        .await
        .expect("queued candidate never sent");

    let sent = session.server.output.sent().await;
    let answer_at = sent
        .iter()
        .position(is_answer_for("ROOM7$S1"))
        .expect("no answer");
    let candidate_at = sent
        .iter()
        .position(is_callee_candidate_for("ROOM7$S1"))
        .expect("no candidate");
    assert!(answer_at < candidate_at, "candidate sent before the answer");

    assert_eq!(peer.record().await.remote_candidates, vec![candidate(2)]);
    assert_eq!(
        session.handle.context().own_session(),
        Some(sid.clone())
    );

    session.handle.leave().await;
}
