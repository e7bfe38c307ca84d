mod context;
mod logger;

pub use context::{PhaseContext, PhaseOutcome, PhaseState, PhaseStatus};
pub use logger::RunLogger;
