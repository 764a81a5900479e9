pub mod snapshot;
pub mod stepper;

pub use snapshot::Snapshot;
pub use stepper::{EngineState, StepEngine, StepOutcome};
