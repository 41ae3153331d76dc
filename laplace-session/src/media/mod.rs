mod capture;
mod media_stream;

pub use capture::{CaptureSource, StaticCapture};
pub use media_stream::{LocalStream, LocalTrack, RemoteStream, RemoteTrack, TrackKind};
