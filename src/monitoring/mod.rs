pub mod notifications;
pub mod trail;
pub use notifications::{Subject, Observer, ConsoleObserver};
pub use trail::{ExecutionTrail, TrailEntry, TrailStats, AttemptStatus};
