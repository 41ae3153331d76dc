mod test_capture_denied;
mod test_candidate_queueing;
mod test_duplicate_answer_ignored;
mod test_room_errors;
mod test_stale_session_ignored;
mod test_transport_closed;
