use crate::command::{Command, Verbosity};
pub trait Observer {
    fn on_update(&self, message: &dyn Command);
}
/// Fan-out point for "state changed" notifications; the message is the command.
pub struct Subject {
    observers: Vec<Box<dyn Observer>>,
    enabled: bool,
}
impl Subject {
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
            enabled: true,
        }
    }
    pub fn subscribe(&mut self, observer: Box<dyn Observer>) {
        self.observers.push(observer);
    }
    pub fn update_all_observers(&self, message: &dyn Command) {
        if !self.enabled {
            return;
        }
        for observer in &self.observers {
            observer.on_update(message);
        }
    }
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}
impl Default for Subject {
    fn default() -> Self {
        Self::new()
    }
}
pub struct ConsoleObserver;
impl Observer for ConsoleObserver {
    fn on_update(&self, message: &dyn Command) {
        println!(
            "[{}] {}", message.command_type().key(), message.format(Verbosity::Summary)
        );
    }
}
