mod clock;
mod context;
mod session_command;
mod session_deps;
mod session_handle;
mod session_observer;
mod sharer;
mod viewer;

pub use clock::{Clock, SystemClock};
pub use context::{LinkInfo, SessionContext};
pub use session_command::SessionCommand;
pub use session_deps::SessionDeps;
pub use session_handle::SessionHandle;
pub use session_observer::{NoopObserver, SessionObserver};
pub use sharer::SharerSession;
pub use viewer::ViewerSession;
