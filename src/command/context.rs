use super::types::{Command, Verbosity};
use crate::{
    errors::{ErrorReporter, Feedback, FileOpError},
    monitoring::{ExecutionTrail, Subject},
    ops::{FileSystem, LeafCommand},
};
use log::debug;
/// Collaborators threaded through every execute/unexecute call.
pub struct ExecContext<'a> {
    fs: &'a dyn FileSystem,
    reporter: &'a mut dyn ErrorReporter,
    trail: &'a mut ExecutionTrail,
    subject: Option<&'a Subject>,
}
impl<'a> ExecContext<'a> {
    pub fn new(
        fs: &'a dyn FileSystem,
        reporter: &'a mut dyn ErrorReporter,
        trail: &'a mut ExecutionTrail,
    ) -> Self {
        Self {
            fs,
            reporter,
            trail,
            subject: None,
        }
    }
    pub fn with_subject(mut self, subject: &'a Subject) -> Self {
        self.subject = Some(subject);
        self
    }
    pub fn fs(&self) -> &'a dyn FileSystem {
        self.fs
    }
    pub fn trail(&self) -> &ExecutionTrail {
        self.trail
    }
    pub fn log_message(&mut self, text: &str) {
        self.reporter.log_message(text);
    }
    pub fn notify(&self, message: &dyn Command) {
        if let Some(subject) = self.subject {
            subject.update_all_observers(message);
        }
    }
}
#[derive(Debug)]
pub enum ExecState {
    Running,
    AwaitingFeedback(FileOpError),
    Done(LeafOutcome),
}
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafOutcome {
    Succeeded,
    /// Dropped from its batch; the batch continues.
    Ignored,
    /// Dropped together with everything not yet attempted.
    Aborted,
}
/// Attempts one leaf until it succeeds or the reporter gives up on it.
pub fn run_leaf(leaf: &dyn LeafCommand, ctx: &mut ExecContext<'_>) -> LeafOutcome {
    let mut state = ExecState::Running;
    loop {
        state = match state {
            ExecState::Running => {
                match leaf.apply(ctx.fs) {
                    Ok(()) => {
                        let text = leaf.format(Verbosity::Detailed);
                        ctx.reporter.log_message(&text);
                        ctx.trail.record_success(text);
                        ExecState::Done(LeafOutcome::Succeeded)
                    }
                    Err(error) => {
                        let text = leaf.format(Verbosity::Detailed);
                        ctx.reporter.log_message(&format!("{} failed: {}", text, error));
                        ctx.trail.record_failure(text, &error);
                        ExecState::AwaitingFeedback(error)
                    }
                }
            }
            ExecState::AwaitingFeedback(error) => {
                let feedback = ctx.reporter.report_file_error(&error);
                debug!("feedback for {}: {:?}", error.path.display(), feedback);
                match feedback {
                    Feedback::Retry => ExecState::Running,
                    Feedback::Ignore => ExecState::Done(LeafOutcome::Ignored),
                    Feedback::Abort => ExecState::Done(LeafOutcome::Aborted),
                }
            }
            ExecState::Done(outcome) => return outcome,
        };
    }
}
