use super::context::ExecContext;
use chrono::{DateTime, Local, NaiveDateTime, SubsecRound, TimeZone};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;
/// `DD-MM-YYYY HH:MM:SS`, shared by the text log and all formatted output.
pub const TIME_FORMAT: &str = "%d-%m-%Y %H:%M:%S";
/// Stable command identity; the keys are persisted in the text log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandType {
    Rename,
    Touch,
    Delete,
    Copy,
    Move,
    CreateFolder,
}
impl CommandType {
    pub const ALL: [CommandType; 6] = [
        CommandType::Rename,
        CommandType::Touch,
        CommandType::Delete,
        CommandType::Copy,
        CommandType::Move,
        CommandType::CreateFolder,
    ];
    pub fn key(self) -> &'static str {
        match self {
            CommandType::Rename => "RENAME",
            CommandType::Touch => "TOUCH",
            CommandType::Delete => "DELETE",
            CommandType::Copy => "COPY",
            CommandType::Move => "MOVE",
            CommandType::CreateFolder => "CREATE-FOLDER",
        }
    }
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.key() == key)
    }
    pub fn verb(self) -> &'static str {
        match self {
            CommandType::Rename => "Rename",
            CommandType::Touch => "Touch",
            CommandType::Delete => "Delete",
            CommandType::Copy => "Copy",
            CommandType::Move => "Move",
            CommandType::CreateFolder => "Create folder",
        }
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Tag or log-entry grammar; this is what the text log stores.
    Brief,
    Summary,
    Detailed,
}
pub trait Command {
    fn command_type(&self) -> CommandType;
    fn execute(&mut self, ctx: &mut ExecContext<'_>) -> bool;
    fn unexecute(&mut self, ctx: &mut ExecContext<'_>) -> bool;
    fn is_undoable(&self) -> bool {
        true
    }
    /// A command with nothing left to run must never reach a stack.
    fn is_zombie(&self) -> bool {
        false
    }
    fn format(&self, verbosity: Verbosity) -> String;
}
pub fn format_system_time(time: SystemTime) -> String {
    DateTime::<Local>::from(time).format(TIME_FORMAT).to_string()
}
pub fn parse_system_time(text: &str) -> Option<SystemTime> {
    let naive = NaiveDateTime::parse_from_str(text.trim(), TIME_FORMAT).ok()?;
    Local.from_local_datetime(&naive).earliest().map(SystemTime::from)
}
pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIME_FORMAT).to_string()
}
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text.trim(), TIME_FORMAT).ok()
}
/// Local wall-clock time truncated to whole seconds, as the log records it.
pub fn now_timestamp() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}
