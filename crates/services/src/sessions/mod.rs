mod plan;
mod run_type;
mod session;
mod stats;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use plan::SessionBuilder;
pub use run_type::RunType;
pub use session::RevisionSession;
pub use stats::{RunStats, SessionSummary};
