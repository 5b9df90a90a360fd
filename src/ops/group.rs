use super::{
    fs::FileSystem,
    leaf::{file_name, render, rooted_path, split_arrow, FileCommand, LeafCommand},
};
use crate::{
    command::{CommandType, Verbosity},
    errors::FileOpError,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
/// Removes a path, or parks it in the trash when `trash` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteCmd {
    pub path: PathBuf,
    pub trash: Option<PathBuf>,
}
impl DeleteCmd {
    pub fn new(path: impl Into<PathBuf>, trash: Option<PathBuf>) -> Self {
        Self { path: path.into(), trash }
    }
    pub fn inverse(&self) -> Option<FileCommand> {
        self.trash
            .as_ref()
            .map(|trash| FileCommand::Move(MoveCmd::new(trash.clone(), self.path.clone())))
    }
    pub fn format_entry(&self) -> String {
        match &self.trash {
            Some(trash) => format!("{} -> {}", self.path.display(), trash.display()),
            None => self.path.display().to_string(),
        }
    }
    pub fn parse_entry(line: &str) -> Option<Self> {
        if let Some((path, trash)) = split_arrow(line) {
            return Some(Self::new(path, Some(trash)));
        }
        rooted_path(line).map(|path| Self::new(path, None))
    }
}
impl LeafCommand for DeleteCmd {
    fn command_type(&self) -> CommandType {
        CommandType::Delete
    }
    fn apply(&self, fs: &dyn FileSystem) -> Result<(), FileOpError> {
        let result = match &self.trash {
            Some(trash) => {
                if let Some(bin) = trash.parent() {
                    if !fs.exists(bin) {
                        fs.create_dir(bin).map_err(|err| FileOpError::from_io(bin, &err))?;
                    }
                }
                fs.rename(&self.path, trash)
            }
            None => fs.remove(&self.path),
        };
        result.map_err(|err| FileOpError::from_io(&self.path, &err))
    }
    fn format(&self, verbosity: Verbosity) -> String {
        let summary = match self.trash {
            Some(_) => format!("{} (to trash)", file_name(& self.path)),
            None => file_name(&self.path),
        };
        render(CommandType::Delete, self.format_entry(), summary, verbosity)
    }
}
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyCmd {
    pub source: PathBuf,
    pub dest: PathBuf,
}
impl CopyCmd {
    pub fn new(source: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            dest: dest.into(),
        }
    }
    pub fn inverse(&self) -> FileCommand {
        FileCommand::Delete(DeleteCmd::new(self.dest.clone(), None))
    }
    pub fn format_entry(&self) -> String {
        format!("{} -> {}", self.source.display(), self.dest.display())
    }
    pub fn parse_entry(line: &str) -> Option<Self> {
        split_arrow(line).map(|(source, dest)| Self { source, dest })
    }
}
impl LeafCommand for CopyCmd {
    fn command_type(&self) -> CommandType {
        CommandType::Copy
    }
    fn apply(&self, fs: &dyn FileSystem) -> Result<(), FileOpError> {
        fs.copy(&self.source, &self.dest)
            .map_err(|err| FileOpError::from_io(&self.source, &err))
    }
    fn format(&self, verbosity: Verbosity) -> String {
        let summary = format!("{} to {}", file_name(& self.source), parent_name(& self.dest));
        render(CommandType::Copy, self.format_entry(), summary, verbosity)
    }
}
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCmd {
    pub source: PathBuf,
    pub dest: PathBuf,
}
impl MoveCmd {
    pub fn new(source: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            dest: dest.into(),
        }
    }
    pub fn inverse(&self) -> FileCommand {
        FileCommand::Move(MoveCmd::new(self.dest.clone(), self.source.clone()))
    }
    pub fn format_entry(&self) -> String {
        format!("{} -> {}", self.source.display(), self.dest.display())
    }
    pub fn parse_entry(line: &str) -> Option<Self> {
        split_arrow(line).map(|(source, dest)| Self { source, dest })
    }
}
impl LeafCommand for MoveCmd {
    fn command_type(&self) -> CommandType {
        CommandType::Move
    }
    fn apply(&self, fs: &dyn FileSystem) -> Result<(), FileOpError> {
        fs.rename(&self.source, &self.dest)
            .map_err(|err| FileOpError::from_io(&self.source, &err))
    }
    fn format(&self, verbosity: Verbosity) -> String {
        let summary = format!("{} to {}", file_name(& self.source), parent_name(& self.dest));
        render(CommandType::Move, self.format_entry(), summary, verbosity)
    }
}
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateFolderCmd {
    pub path: PathBuf,
}
impl CreateFolderCmd {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
    pub fn inverse(&self) -> FileCommand {
        FileCommand::Delete(DeleteCmd::new(self.path.clone(), None))
    }
    pub fn format_entry(&self) -> String {
        self.path.display().to_string()
    }
    pub fn parse_entry(line: &str) -> Option<Self> {
        rooted_path(line).map(Self::new)
    }
}
impl LeafCommand for CreateFolderCmd {
    fn command_type(&self) -> CommandType {
        CommandType::CreateFolder
    }
    fn apply(&self, fs: &dyn FileSystem) -> Result<(), FileOpError> {
        fs.create_dir(&self.path).map_err(|err| FileOpError::from_io(&self.path, &err))
    }
    fn format(&self, verbosity: Verbosity) -> String {
        render(
            CommandType::CreateFolder,
            self.format_entry(),
            file_name(&self.path),
            verbosity,
        )
    }
}
fn parent_name(path: &Path) -> String {
    path.parent().map(file_name).unwrap_or_default()
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{errors::ErrorCode, ops::RealFs};
    use std::fs;
    use tempfile::tempdir;
    #[test]
    fn test_delete_entry_grammar() {
        let parked = DeleteCmd::parse_entry("/d/a.txt -> /t/1/a.txt").unwrap();
        assert_eq!(parked.trash, Some(PathBuf::from("/t/1/a.txt")));
        let gone = DeleteCmd::parse_entry("/d/a.txt").unwrap();
        assert_eq!(gone.trash, None);
        assert_eq!(gone.format_entry(), "/d/a.txt");
        assert!(DeleteCmd::parse_entry("").is_none());
        assert!(DeleteCmd::parse_entry("[REDO SECTION]").is_none());
        assert!(DeleteCmd::parse_entry("relative/a.txt").is_none());
        assert!(DeleteCmd::parse_entry(r"C:\d\a.txt").is_some());
    }
    #[test]
    fn test_create_folder_entry_needs_rooted_path() {
        assert!(CreateFolderCmd::parse_entry("/d/made").is_some());
        assert!(CreateFolderCmd::parse_entry("garbage line here").is_none());
        assert!(CreateFolderCmd::parse_entry("<END OF BATCH>").is_none());
    }
    #[test]
    fn test_trash_delete_and_restore() {
        let temp_dir = tempdir().unwrap();
        let file = temp_dir.path().join("doomed.txt");
        fs::write(&file, "keep me").unwrap();
        let trash = temp_dir.path().join("trash").join("batch1").join("doomed.txt");
        fs::create_dir(temp_dir.path().join("trash")).unwrap();
        let cmd = DeleteCmd::new(&file, Some(trash.clone()));
        cmd.apply(&RealFs).unwrap();
        assert!(!file.exists());
        assert!(trash.exists());
        let restore = cmd.inverse().unwrap();
        restore.apply(&RealFs).unwrap();
        assert_eq!(fs::read_to_string(&file).unwrap(), "keep me");
    }
    #[test]
    fn test_copy_inverse_removes_copy() {
        let temp_dir = tempdir().unwrap();
        let source = temp_dir.path().join("src.txt");
        let dest = temp_dir.path().join("dst.txt");
        fs::write(&source, "data").unwrap();
        let cmd = CopyCmd::new(&source, &dest);
        cmd.apply(&RealFs).unwrap();
        let again = cmd.apply(&RealFs).unwrap_err();
        assert_eq!(again.code, ErrorCode::AlreadyExists);
        cmd.inverse().apply(&RealFs).unwrap();
        assert!(!dest.exists());
        assert!(source.exists());
    }
    #[test]
    fn test_create_folder_roundtrip() {
        let temp_dir = tempdir().unwrap();
        let dir = temp_dir.path().join("made");
        let cmd = CreateFolderCmd::new(&dir);
        cmd.apply(&RealFs).unwrap();
        assert!(dir.is_dir());
        assert_eq!(cmd.format(Verbosity::Summary), "Create folder made");
        cmd.inverse().apply(&RealFs).unwrap();
        assert!(!dir.exists());
    }
}
