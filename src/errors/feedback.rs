use super::types::{ErrorCode, FileOpError};
use log::{info, warn};
use std::{
    collections::HashMap, io::{BufRead, Write},
    path::PathBuf, time::Duration,
};
/// Resolution chosen for a failed leaf operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Abort,
    Retry,
    Ignore,
}
/// Blocking error prompt plus the non-blocking message sink.
pub trait ErrorReporter {
    fn report_file_error(&mut self, error: &FileOpError) -> Feedback;
    fn log_message(&mut self, text: &str);
}
#[derive(Debug, Clone)]
pub enum RecoveryStrategy {
    Retry { max_attempts: u32, delay: Duration },
    Skip,
    Fail,
}
/// Answers error prompts from a per-code strategy table instead of asking.
pub struct PolicyReporter {
    strategies: HashMap<ErrorCode, RecoveryStrategy>,
    attempts: HashMap<PathBuf, u32>,
}
impl PolicyReporter {
    pub fn new() -> Self {
        let mut strategies = HashMap::new();
        strategies.insert(ErrorCode::FileNotFound, RecoveryStrategy::Skip);
        strategies
            .insert(
                ErrorCode::PermissionDenied,
                RecoveryStrategy::Retry {
                    max_attempts: 2,
                    delay: Duration::from_millis(100),
                },
            );
        Self {
            strategies,
            attempts: HashMap::new(),
        }
    }
    pub fn get_strategy(&self, code: ErrorCode) -> RecoveryStrategy {
        self.strategies.get(&code).cloned().unwrap_or(RecoveryStrategy::Skip)
    }
    pub fn set_strategy(&mut self, code: ErrorCode, strategy: RecoveryStrategy) {
        self.strategies.insert(code, strategy);
    }
}
impl Default for PolicyReporter {
    fn default() -> Self {
        Self::new()
    }
}
impl ErrorReporter for PolicyReporter {
    fn report_file_error(&mut self, error: &FileOpError) -> Feedback {
        let feedback = match self.get_strategy(error.code) {
            RecoveryStrategy::Retry { max_attempts, delay } => {
                let attempts = self.attempts.entry(error.path.clone()).or_insert(0);
                *attempts += 1;
                if *attempts <= max_attempts {
                    if !delay.is_zero() {
                        std::thread::sleep(delay);
                    }
                    Feedback::Retry
                } else {
                    self.attempts.remove(&error.path);
                    Feedback::Ignore
                }
            }
            RecoveryStrategy::Skip => Feedback::Ignore,
            RecoveryStrategy::Fail => Feedback::Abort,
        };
        warn!("{} -> {:?}", error, feedback);
        feedback
    }
    fn log_message(&mut self, text: &str) {
        info!("{}", text);
    }
}
/// Interactive prompt; end of input counts as Abort.
pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
}
impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
    pub fn into_output(self) -> W {
        self.output
    }
}
impl ConsolePrompt<std::io::StdinLock<'static>, std::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}
impl<R: BufRead, W: Write> ErrorReporter for ConsolePrompt<R, W> {
    fn report_file_error(&mut self, error: &FileOpError) -> Feedback {
        let _ = writeln!(
            self.output, "Error: {}\n  {}", error.path.display(), error.message
        );
        loop {
            let _ = write!(self.output, "[r]etry, [i]gnore, [a]bort? ");
            let _ = self.output.flush();
            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) | Err(_) => return Feedback::Abort,
                Ok(_) => {}
            }
            match line.trim().to_lowercase().chars().next() {
                Some('r') => return Feedback::Retry,
                Some('i') => return Feedback::Ignore,
                Some('a') => return Feedback::Abort,
                _ => {
                    let _ = writeln!(self.output, "Please answer r, i or a.");
                }
            }
        }
    }
    fn log_message(&mut self, text: &str) {
        let _ = writeln!(self.output, "{}", text);
    }
}
