pub use laplace_core::model::{RoomId, SessionId};

pub mod model {
    pub use laplace_core::model::*;
    pub use laplace_core::utils;
}

#[cfg(feature = "session")]
pub mod session {
    pub use laplace_session::*;
}
