pub mod types;
pub mod feedback;
pub use types::{FileOpError, ErrorCode, BatchError};
pub use feedback::{Feedback, ErrorReporter, PolicyReporter, ConsolePrompt, RecoveryStrategy};
