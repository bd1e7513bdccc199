#![forbid(unsafe_code)]

pub mod error;
pub mod filter;
pub mod session_loop;
pub mod sessions;
pub mod settings;
pub mod time;

pub use time::Clock;

pub use error::{ConfigError, FilterError, RunTypeError, SessionError};
pub use filter::{FilterAction, FilterStep, QuestionFilter, RangeStep, ValueStep};
pub use session_loop::SessionLoopService;
pub use sessions::{RevisionSession, RunStats, RunType, SessionBuilder, SessionSummary};
pub use settings::{SessionSettings, Settings};
