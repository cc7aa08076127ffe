//! Recording session domain module

mod session;
mod state;

pub use session::{InvalidStateTransition, RecordingSession};
pub use state::{ErrorKind, SessionError, SessionPhase, SessionState};
