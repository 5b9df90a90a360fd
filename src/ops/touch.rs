use super::{
    fs::{FileStamp, FileSystem},
    leaf::{file_name, render, FileCommand, LeafCommand},
};
use crate::{
    command::{format_system_time, parse_system_time, CommandType, Verbosity},
    errors::FileOpError,
};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::SystemTime};
/// Rewrites timestamps and the read-only flag; `before` is what undo restores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TouchCmd {
    pub path: PathBuf,
    pub before: FileStamp,
    pub after: FileStamp,
}
impl TouchCmd {
    pub fn new(path: impl Into<PathBuf>, before: FileStamp, after: FileStamp) -> Self {
        Self {
            path: path.into(),
            before,
            after,
        }
    }
    pub fn inverse(&self) -> FileCommand {
        FileCommand::Touch(TouchCmd::new(self.path.clone(), self.after.clone(), self.before.clone()))
    }
    /// `path {M: t0 -> t1; A: t0 -> t1; R: 0 -> 1}`, listing only the fields in play.
    pub fn format_entry(&self) -> String {
        let mut diffs = Vec::new();
        if self.before.modified.is_some() || self.after.modified.is_some() {
            diffs
                .push(
                    format!(
                        "M: {} -> {}", time_field(self.before.modified),
                        time_field(self.after.modified)
                    ),
                );
        }
        if self.before.accessed.is_some() || self.after.accessed.is_some() {
            diffs
                .push(
                    format!(
                        "A: {} -> {}", time_field(self.before.accessed),
                        time_field(self.after.accessed)
                    ),
                );
        }
        if self.before.readonly.is_some() || self.after.readonly.is_some() {
            diffs
                .push(
                    format!(
                        "R: {} -> {}", flag_field(self.before.readonly),
                        flag_field(self.after.readonly)
                    ),
                );
        }
        format!("{} {{{}}}", self.path.display(), diffs.join("; "))
    }
    pub fn parse_entry(line: &str) -> Option<Self> {
        let body_start = line.rfind(" {")?;
        let path = &line[..body_start];
        let body = line[body_start + 2..].strip_suffix('}')?;
        if path.is_empty() {
            return None;
        }
        let mut before = FileStamp::default();
        let mut after = FileStamp::default();
        for diff in body.split("; ").filter(|d| !d.is_empty()) {
            let (tag, change) = diff.split_once(": ")?;
            let (old, new) = change.split_once(" -> ")?;
            match tag {
                "M" => {
                    before.modified = parse_time_field(old)?;
                    after.modified = parse_time_field(new)?;
                }
                "A" => {
                    before.accessed = parse_time_field(old)?;
                    after.accessed = parse_time_field(new)?;
                }
                "R" => {
                    before.readonly = parse_flag_field(old)?;
                    after.readonly = parse_flag_field(new)?;
                }
                _ => return None,
            }
        }
        Some(Self::new(path, before, after))
    }
}
impl LeafCommand for TouchCmd {
    fn command_type(&self) -> CommandType {
        CommandType::Touch
    }
    fn apply(&self, fs: &dyn FileSystem) -> Result<(), FileOpError> {
        fs.set_stamp(&self.path, &self.after)
            .map_err(|err| FileOpError::from_io(&self.path, &err))
    }
    fn format(&self, verbosity: Verbosity) -> String {
        let mut fields = Vec::new();
        if self.after.modified.is_some() {
            fields.push("modified");
        }
        if self.after.accessed.is_some() {
            fields.push("accessed");
        }
        if let Some(readonly) = self.after.readonly {
            fields.push(if readonly { "read-only" } else { "writable" });
        }
        let summary = format!("{} ({})", file_name(& self.path), fields.join(", "));
        render(CommandType::Touch, self.format_entry(), summary, verbosity)
    }
}
fn time_field(time: Option<SystemTime>) -> String {
    time.map(format_system_time).unwrap_or_else(|| "-".to_string())
}
fn flag_field(flag: Option<bool>) -> &'static str {
    match flag {
        Some(true) => "1",
        Some(false) => "0",
        None => "-",
    }
}
/// Outer `None` is a parse failure, inner `None` an untouched field.
fn parse_time_field(text: &str) -> Option<Option<SystemTime>> {
    if text == "-" { Some(None) } else { parse_system_time(text).map(Some) }
}
fn parse_flag_field(text: &str) -> Option<Option<bool>> {
    match text {
        "1" => Some(Some(true)),
        "0" => Some(Some(false)),
        "-" => Some(None),
        _ => None,
    }
}
