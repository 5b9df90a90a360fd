use crate::errors::FileOpError;
use log::{info, warn};
use std::time::{Duration, Instant, SystemTime};
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptStatus {
    Succeeded,
    Failed,
}
#[derive(Debug, Clone)]
pub struct TrailEntry {
    pub timestamp: SystemTime,
    pub status: AttemptStatus,
    pub description: String,
    pub error: Option<String>,
}
/// Every attempted leaf operation, in the order it was attempted.
pub struct ExecutionTrail {
    entries: Vec<TrailEntry>,
    start_time: Instant,
}
impl ExecutionTrail {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            start_time: Instant::now(),
        }
    }
    pub fn record_success(&mut self, description: String) {
        info!("{}", description);
        self.entries
            .push(TrailEntry {
                timestamp: SystemTime::now(),
                status: AttemptStatus::Succeeded,
                description,
                error: None,
            });
    }
    pub fn record_failure(&mut self, description: String, error: &FileOpError) {
        warn!("{} failed: {}", description, error);
        self.entries
            .push(TrailEntry {
                timestamp: SystemTime::now(),
                status: AttemptStatus::Failed,
                description,
                error: Some(error.message.clone()),
            });
    }
    pub fn entries(&self) -> &[TrailEntry] {
        &self.entries
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn clear(&mut self) {
        self.entries.clear();
    }
    pub fn stats(&self) -> TrailStats {
        let succeeded = self
            .entries
            .iter()
            .filter(|e| e.status == AttemptStatus::Succeeded)
            .count();
        TrailStats {
            total: self.entries.len(),
            succeeded,
            failed: self.entries.len() - succeeded,
            uptime: self.start_time.elapsed(),
        }
    }
    /// Balloon text for the whole run.
    pub fn summary(&self) -> String {
        let stats = self.stats();
        if stats.failed == 0 {
            format!("{} succeeded", stats.succeeded)
        } else {
            format!("{} succeeded, {} failed", stats.succeeded, stats.failed)
        }
    }
}
impl Default for ExecutionTrail {
    fn default() -> Self {
        Self::new()
    }
}
#[derive(Debug, Clone)]
pub struct TrailStats {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub uptime: Duration,
}
