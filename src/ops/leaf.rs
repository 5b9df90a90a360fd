use super::{
    fs::FileSystem, group::{CopyCmd, CreateFolderCmd, DeleteCmd, MoveCmd},
    rename::RenameCmd, touch::TouchCmd,
};
use crate::{
    command::{run_leaf, Command, CommandType, ExecContext, LeafOutcome, Verbosity},
    errors::FileOpError,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
/// One filesystem mutation and nothing else.
pub trait LeafCommand {
    fn command_type(&self) -> CommandType;
    fn apply(&self, fs: &dyn FileSystem) -> Result<(), FileOpError>;
    fn format(&self, verbosity: Verbosity) -> String;
}
/// Every persistable leaf; the variant is the discriminant written first on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileCommand {
    Rename(RenameCmd),
    Touch(TouchCmd),
    Delete(DeleteCmd),
    Copy(CopyCmd),
    Move(MoveCmd),
    CreateFolder(CreateFolderCmd),
}
impl FileCommand {
    fn leaf(&self) -> &dyn LeafCommand {
        match self {
            FileCommand::Rename(cmd) => cmd,
            FileCommand::Touch(cmd) => cmd,
            FileCommand::Delete(cmd) => cmd,
            FileCommand::Copy(cmd) => cmd,
            FileCommand::Move(cmd) => cmd,
            FileCommand::CreateFolder(cmd) => cmd,
        }
    }
    pub fn command_type(&self) -> CommandType {
        self.leaf().command_type()
    }
    pub fn format(&self, verbosity: Verbosity) -> String {
        self.leaf().format(verbosity)
    }
    pub fn is_undoable(&self) -> bool {
        match self {
            FileCommand::Delete(cmd) => cmd.trash.is_some(),
            _ => true,
        }
    }
    pub fn primary_path(&self) -> &Path {
        match self {
            FileCommand::Rename(cmd) => &cmd.source,
            FileCommand::Touch(cmd) => &cmd.path,
            FileCommand::Delete(cmd) => &cmd.path,
            FileCommand::Copy(cmd) => &cmd.source,
            FileCommand::Move(cmd) => &cmd.source,
            FileCommand::CreateFolder(cmd) => &cmd.path,
        }
    }
    pub fn make_unexecute_cmd(&self) -> Option<ReverseCommand> {
        let inverse = match self {
            FileCommand::Rename(cmd) => cmd.inverse(),
            FileCommand::Touch(cmd) => cmd.inverse(),
            FileCommand::Delete(cmd) => cmd.inverse()?,
            FileCommand::Copy(cmd) => cmd.inverse(),
            FileCommand::Move(cmd) => cmd.inverse(),
            FileCommand::CreateFolder(cmd) => cmd.inverse(),
        };
        Some(ReverseCommand {
            command: inverse,
            origin: self.clone(),
        })
    }
    /// Parses one brief-verbosity line back into the leaf type `kind`.
    pub fn parse_entry(kind: CommandType, line: &str) -> Option<Self> {
        match kind {
            CommandType::Rename => RenameCmd::parse_entry(line).map(FileCommand::Rename),
            CommandType::Touch => TouchCmd::parse_entry(line).map(FileCommand::Touch),
            CommandType::Delete => DeleteCmd::parse_entry(line).map(FileCommand::Delete),
            CommandType::Copy => CopyCmd::parse_entry(line).map(FileCommand::Copy),
            CommandType::Move => MoveCmd::parse_entry(line).map(FileCommand::Move),
            CommandType::CreateFolder => {
                CreateFolderCmd::parse_entry(line).map(FileCommand::CreateFolder)
            }
        }
    }
}
impl LeafCommand for FileCommand {
    fn command_type(&self) -> CommandType {
        FileCommand::command_type(self)
    }
    fn apply(&self, fs: &dyn FileSystem) -> Result<(), FileOpError> {
        self.leaf().apply(fs)
    }
    fn format(&self, verbosity: Verbosity) -> String {
        FileCommand::format(self, verbosity)
    }
}
impl Command for FileCommand {
    fn command_type(&self) -> CommandType {
        FileCommand::command_type(self)
    }
    fn execute(&mut self, ctx: &mut ExecContext<'_>) -> bool {
        let done = run_leaf(&*self, ctx) == LeafOutcome::Succeeded;
        if done {
            ctx.notify(&*self);
        }
        done
    }
    fn unexecute(&mut self, ctx: &mut ExecContext<'_>) -> bool {
        let done = match self.make_unexecute_cmd() {
            Some(reverse) => run_leaf(&reverse, ctx) == LeafOutcome::Succeeded,
            None => false,
        };
        if done {
            ctx.notify(&*self);
        }
        done
    }
    fn is_undoable(&self) -> bool {
        FileCommand::is_undoable(self)
    }
    fn format(&self, verbosity: Verbosity) -> String {
        FileCommand::format(self, verbosity)
    }
}
/// The inverse of a leaf; it owns a copy of the leaf it reverses and reads
/// its description from there.
#[derive(Debug, Clone)]
pub struct ReverseCommand {
    command: FileCommand,
    origin: FileCommand,
}
impl ReverseCommand {
    pub fn command(&self) -> &FileCommand {
        &self.command
    }
    pub fn origin(&self) -> &FileCommand {
        &self.origin
    }
}
impl LeafCommand for ReverseCommand {
    fn command_type(&self) -> CommandType {
        self.origin.command_type()
    }
    fn apply(&self, fs: &dyn FileSystem) -> Result<(), FileOpError> {
        self.command.apply(fs)
    }
    fn format(&self, verbosity: Verbosity) -> String {
        self.origin.format(verbosity)
    }
}
pub(crate) fn render(
    kind: CommandType,
    entry: String,
    summary: String,
    verbosity: Verbosity,
) -> String {
    match verbosity {
        Verbosity::Brief => entry,
        Verbosity::Summary => format!("{} {}", kind.verb(), summary),
        Verbosity::Detailed => format!("{}: {}", kind.verb(), entry),
    }
}
pub(crate) fn split_arrow(line: &str) -> Option<(PathBuf, PathBuf)> {
    let (source, dest) = line.split_once(" -> ")?;
    if source.is_empty() || dest.is_empty() {
        return None;
    }
    Some((PathBuf::from(source), PathBuf::from(dest)))
}
/// A bare path entry as written by the log: rooted, and not a tag or header line.
pub(crate) fn rooted_path(line: &str) -> Option<PathBuf> {
    if line.is_empty() || line.contains(" -> ") || line.starts_with(&['[', '<'][..]) {
        return None;
    }
    let bytes = line.as_bytes();
    let drive = bytes.len() > 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
        && matches!(bytes[2], b'\\' | b'/');
    if Path::new(line).has_root() || drive {
        Some(PathBuf::from(line))
    } else {
        None
    }
}
pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
