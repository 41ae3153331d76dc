mod session_context;

pub use session_context::{LinkInfo, SessionContext};
