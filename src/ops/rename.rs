use super::{
    fs::FileSystem, leaf::{file_name, render, split_arrow, FileCommand, LeafCommand},
};
use crate::{
    command::{CommandType, Verbosity},
    errors::FileOpError,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameCmd {
    pub source: PathBuf,
    pub dest: PathBuf,
}
impl RenameCmd {
    pub fn new(source: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            dest: dest.into(),
        }
    }
    pub fn inverse(&self) -> FileCommand {
        FileCommand::Rename(RenameCmd::new(self.dest.clone(), self.source.clone()))
    }
    pub fn format_entry(&self) -> String {
        format!("{} -> {}", self.source.display(), self.dest.display())
    }
    pub fn parse_entry(line: &str) -> Option<Self> {
        split_arrow(line).map(|(source, dest)| Self { source, dest })
    }
}
impl LeafCommand for RenameCmd {
    fn command_type(&self) -> CommandType {
        CommandType::Rename
    }
    fn apply(&self, fs: &dyn FileSystem) -> Result<(), FileOpError> {
        fs.rename(&self.source, &self.dest)
            .map_err(|err| FileOpError::from_io(&self.source, &err))
    }
    fn format(&self, verbosity: Verbosity) -> String {
        let summary = format!(
            "{} -> {}", file_name(& self.source), file_name(& self.dest)
        );
        render(CommandType::Rename, self.format_entry(), summary, verbosity)
    }
}
