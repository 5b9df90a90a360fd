pub mod text;
pub mod binary;
use crate::{command::MacroCommand, LogFormat};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::{
    fs, io::Write, path::{Path, PathBuf},
    time::SystemTime,
};
use tempfile::NamedTempFile;
pub const UNDO_SECTION: &str = "UNDO SECTION";
pub const REDO_SECTION: &str = "REDO SECTION";
pub const TEXT_LOG_NAME: &str = "history.txt";
pub const BINARY_LOG_NAME: &str = "history.bin";
/// Both stacks as read from disk, bottom to top.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedHistory {
    pub undo: Vec<MacroCommand>,
    pub redo: Vec<MacroCommand>,
}
impl LoadedHistory {
    pub fn is_empty(&self) -> bool {
        self.undo.is_empty() && self.redo.is_empty()
    }
}
/// Reads and writes the persisted undo log in either format.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    logs_dir: PathBuf,
    compression: u8,
}
impl HistoryStore {
    pub fn new(logs_dir: impl Into<PathBuf>, compression: u8) -> Self {
        Self {
            logs_dir: logs_dir.into(),
            compression,
        }
    }
    pub fn path_for(&self, format: LogFormat) -> PathBuf {
        match format {
            LogFormat::Text => self.logs_dir.join(TEXT_LOG_NAME),
            LogFormat::Binary => self.logs_dir.join(BINARY_LOG_NAME),
        }
    }
    pub fn try_save(
        &self,
        format: LogFormat,
        undo: &[&MacroCommand],
        redo: &[&MacroCommand],
    ) -> Result<PathBuf> {
        let path = self.path_for(format);
        let data = match format {
            LogFormat::Text => text::render_log(undo, redo).into_bytes(),
            LogFormat::Binary => binary::encode(undo, redo, self.compression)?,
        };
        write_atomic(&path, &data)?;
        debug!(
            "saved {} undo / {} redo batches to {:?}", undo.len(), redo.len(), path
        );
        Ok(path)
    }
    /// Like `try_save`, but a failure is only logged.
    pub fn save(&self, format: LogFormat, undo: &[&MacroCommand], redo: &[&MacroCommand]) -> bool {
        match self.try_save(format, undo, redo) {
            Ok(_) => true,
            Err(e) => {
                warn!("could not save history: {e:?}");
                false
            }
        }
    }
    /// The log to read: the newer of the two when both exist.
    pub fn select_source(&self) -> Option<(LogFormat, PathBuf)> {
        let text = self.candidate(LogFormat::Text);
        let binary = self.candidate(LogFormat::Binary);
        match (text, binary) {
            (Some((text_path, text_time)), Some((binary_path, binary_time))) => {
                if text_time > binary_time {
                    Some((LogFormat::Text, text_path))
                } else {
                    Some((LogFormat::Binary, binary_path))
                }
            }
            (Some((path, _)), None) => Some((LogFormat::Text, path)),
            (None, Some((path, _))) => Some((LogFormat::Binary, path)),
            (None, None) => None,
        }
    }
    fn candidate(&self, format: LogFormat) -> Option<(PathBuf, SystemTime)> {
        let path = self.path_for(format);
        let modified = fs::metadata(&path).and_then(|m| m.modified()).ok()?;
        Some((path, modified))
    }
    pub fn try_load(&self) -> Result<LoadedHistory> {
        let Some((format, path)) = self.select_source() else {
            debug!("no history in {:?}", self.logs_dir);
            return Ok(LoadedHistory::default());
        };
        let history = match format {
            LogFormat::Text => {
                let content = fs::read_to_string(&path)
                    .with_context(|| format!("cannot read {:?}", path))?;
                text::parse_log(&content)
            }
            LogFormat::Binary => {
                let data = fs::read(&path)
                    .with_context(|| format!("cannot read {:?}", path))?;
                binary::decode(&data).with_context(|| format!("corrupt history {:?}", path))?
            }
        };
        info!(
            "loaded {} undo / {} redo batches from {:?}", history.undo.len(), history
            .redo.len(), path
        );
        Ok(history)
    }
    /// Any failure reads as an empty history.
    pub fn load(&self) -> LoadedHistory {
        self.try_load()
            .unwrap_or_else(|e| {
                warn!("ignoring unreadable history: {e:?}");
                LoadedHistory::default()
            })
    }
    pub fn remove_files(&self) -> Result<()> {
        for format in [LogFormat::Text, LogFormat::Binary] {
            let path = self.path_for(format);
            if path.exists() {
                fs::remove_file(&path).with_context(|| format!("cannot remove {:?}", path))?;
            }
        }
        Ok(())
    }
}
fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).with_context(|| format!("cannot create directory {:?}", dir))?;
    let mut temp = NamedTempFile::new_in(dir)
        .with_context(|| format!("cannot create temporary file in {:?}", dir))?;
    temp.write_all(data)?;
    temp.flush()?;
    temp.persist(path).with_context(|| format!("cannot atomically replace {:?}", path))?;
    Ok(())
}
