use anyhow::{bail, Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashSet, fmt, fs, path::{Path, PathBuf},
    str::FromStr,
};
pub mod command;
pub mod ops;
pub mod history;
pub mod monitoring;
pub mod config;
pub mod errors;
#[cfg(test)]
mod tests;
use command::{Command, CommandModel, CommandType, ExecContext, MacroCommand, Verbosity};
use config::ConfigValidator;
use errors::{BatchError, ErrorReporter};
use history::HistoryStore;
use monitoring::{ExecutionTrail, Observer, Subject, TrailEntry};
use ops::{
    build_rename_macro, intermediate_path, validate_pairs, CopyCmd, CreateFolderCmd,
    DeleteCmd, FileCommand, FileStamp, FileSystem, MoveCmd, RealFs, TouchCmd,
};
pub const DEFAULT_MAX_COMMANDS: usize = 100;
pub const CONFIG_FILE_NAME: &str = "config.json";
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundoConfig {
    pub home_dir: PathBuf,
    pub history: HistoryConfig,
    pub trash: TrashConfig,
}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    pub max_commands: usize,
    pub log_format: LogFormat,
    pub autosave: bool,
    pub compression: u8,
}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrashConfig {
    pub enabled: bool,
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Binary,
}
impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Binary => write!(f, "binary"),
        }
    }
}
impl FromStr for LogFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(LogFormat::Text),
            "binary" | "bin" => Ok(LogFormat::Binary),
            other => Err(format!("unknown log format '{}' (expected text or binary)", other)),
        }
    }
}
impl Default for FundoConfig {
    fn default() -> Self {
        Self {
            home_dir: get_default_home_dir(),
            history: HistoryConfig {
                max_commands: DEFAULT_MAX_COMMANDS,
                log_format: LogFormat::Text,
                autosave: true,
                compression: 6,
            },
            trash: TrashConfig { enabled: true },
        }
    }
}
/// Fields of a touch request; `None` leaves that attribute alone.
pub type TouchSpec = FileStamp;
/// Outcome of one manager call, for the caller's balloon/summary.
#[derive(Debug, Clone)]
pub struct ExecReport {
    pub succeeded: bool,
    pub steps: usize,
    pub summary: String,
    pub entries: Vec<TrailEntry>,
}
impl ExecReport {
    fn from_trail(succeeded: bool, steps: usize, trail: &ExecutionTrail) -> Self {
        Self {
            succeeded,
            steps,
            summary: trail.summary(),
            entries: trail.entries().to_vec(),
        }
    }
}
/// Both stacks rendered for display, most recent first.
#[derive(Debug, Clone, Default)]
pub struct HistoryLines {
    pub undo: Vec<String>,
    pub redo: Vec<String>,
}
pub struct UndoManager {
    config: FundoConfig,
    model: CommandModel,
    store: HistoryStore,
    subject: Subject,
    fs: Box<dyn FileSystem>,
}
pub fn get_default_home_dir() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".fundo")
    } else if let Ok(user) = std::env::var("USERPROFILE") {
        PathBuf::from(user).join(".fundo")
    } else {
        std::env::temp_dir().join(".fundo")
    }
}
pub fn generate_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    format!("{:x}", timestamp)
}
impl UndoManager {
    pub fn new() -> Result<Self> {
        Self::open(get_default_home_dir())
    }
    /// Opens the manager rooted at `home_dir`, reading its config and history.
    pub fn open(home_dir: impl Into<PathBuf>) -> Result<Self> {
        let config = Self::load_config(&home_dir.into())?;
        Self::with_config(config)
    }
    pub fn with_config(mut config: FundoConfig) -> Result<Self> {
        let validator = ConfigValidator::new();
        let result = validator.validate_and_fix_config(&mut config)?;
        for warning in &result.warnings {
            warn!("config {}: {}", warning.field, warning.message);
        }
        let remaining = validator.validate_config(&config);
        if !remaining.is_valid {
            let messages: Vec<String> = remaining
                .errors
                .iter()
                .map(|e| format!("{}: {}", e.field, e.message))
                .collect();
            bail!("invalid configuration: {}", messages.join("; "));
        }
        Self::setup_directory_structure(&config.home_dir)?;
        let store = HistoryStore::new(
            config.home_dir.join("logs"),
            config.history.compression,
        );
        let mut manager = Self {
            config,
            model: CommandModel::new(),
            store,
            subject: Subject::new(),
            fs: Box::new(RealFs),
        };
        manager.load_history();
        Ok(manager)
    }
    pub fn setup_directory_structure(home_dir: &Path) -> Result<()> {
        for dir in [home_dir.to_path_buf(), home_dir.join("logs"), home_dir.join("trash")] {
            fs::create_dir_all(&dir)
                .with_context(|| format!("cannot create directory {:?}", dir))?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let mut perms = fs::metadata(&dir)?.permissions();
                perms.set_mode(0o700);
                fs::set_permissions(&dir, perms)?;
            }
        }
        debug!("fundo directory structure ready at {:?}", home_dir);
        Ok(())
    }
    /// Reads `<home>/config.json`, falling back to defaults rooted at `home_dir`.
    pub fn load_config(home_dir: &Path) -> Result<FundoConfig> {
        let config_path = home_dir.join(CONFIG_FILE_NAME);
        let mut config = if config_path.exists() {
            let config_data = fs::read_to_string(&config_path)
                .with_context(|| format!("cannot read {:?}", config_path))?;
            serde_json::from_str::<FundoConfig>(&config_data)
                .with_context(|| format!("cannot parse {:?}", config_path))?
        } else {
            FundoConfig::default()
        };
        config.home_dir = home_dir.to_path_buf();
        Ok(config)
    }
    pub fn save_config(&self) -> Result<()> {
        let config_path = self.config.home_dir.join(CONFIG_FILE_NAME);
        let config_data = serde_json::to_string_pretty(&self.config)?;
        fs::write(&config_path, config_data)
            .with_context(|| format!("cannot write {:?}", config_path))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&config_path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&config_path, perms)?;
        }
        Ok(())
    }
    pub fn config(&self) -> &FundoConfig {
        &self.config
    }
    /// Applies a config change; the new values are validated before they stick.
    pub fn update_config(&mut self, update: impl FnOnce(&mut FundoConfig)) -> Result<()> {
        let mut config = self.config.clone();
        update(&mut config);
        config.home_dir = self.config.home_dir.clone();
        let result = ConfigValidator::new().validate_config(&config);
        if let Some(error) = result.errors.first() {
            bail!("{}: {}", error.field, error.message);
        }
        self.config = config;
        self.store = HistoryStore::new(
            self.config.home_dir.join("logs"),
            self.config.history.compression,
        );
        self.model.remove_expired_commands(self.config.history.max_commands);
        self.save_config()
    }
    pub fn set_file_system(&mut self, fs: Box<dyn FileSystem>) {
        self.fs = fs;
    }
    pub fn subscribe(&mut self, observer: Box<dyn Observer>) {
        self.subject.subscribe(observer);
    }
    pub fn model(&self) -> &CommandModel {
        &self.model
    }
    pub fn can_undo(&self) -> bool {
        self.model.can_undo()
    }
    pub fn can_redo(&self) -> bool {
        self.model.can_redo()
    }
    pub fn rename(
        &mut self,
        pairs: &[(PathBuf, PathBuf)],
        reporter: &mut dyn ErrorReporter,
    ) -> Result<ExecReport> {
        let batch = build_rename_macro(pairs, self.fs.as_ref())?;
        self.run_batch(batch, reporter)
    }
    pub fn touch(
        &mut self,
        paths: &[PathBuf],
        spec: &TouchSpec,
        reporter: &mut dyn ErrorReporter,
    ) -> Result<ExecReport> {
        if paths.is_empty() || spec.is_empty() {
            return Err(BatchError::Empty.into());
        }
        let after = spec.whole_seconds();
        let mut batch = MacroCommand::new(CommandType::Touch);
        for path in unique(paths) {
            let before = match self.fs.stamp(path) {
                Ok(current) => {
                    FileStamp {
                        modified: spec.modified.and(current.modified),
                        accessed: spec.accessed.and(current.accessed),
                        readonly: spec.readonly.and(current.readonly),
                    }
                        .whole_seconds()
                }
                Err(e) => {
                    warn!("cannot read attributes of {:?}: {}", path, e);
                    FileStamp::default()
                }
            };
            batch.push(FileCommand::Touch(TouchCmd::new(path.clone(), before, after.clone())));
        }
        self.run_batch(batch, reporter)
    }
    /// Deletes into the trash when it is enabled, unless `permanent` is set.
    pub fn delete(
        &mut self,
        paths: &[PathBuf],
        permanent: bool,
        reporter: &mut dyn ErrorReporter,
    ) -> Result<ExecReport> {
        if paths.is_empty() {
            return Err(BatchError::Empty.into());
        }
        let bin = (self.config.trash.enabled && !permanent)
            .then(|| self.config.home_dir.join("trash").join(generate_id()));
        let mut batch = MacroCommand::new(CommandType::Delete);
        let mut taken: HashSet<PathBuf> = HashSet::new();
        for path in unique(paths) {
            let trash = bin
                .as_ref()
                .and_then(|bin| {
                    let name = path.file_name()?;
                    let mut slot = bin.join(name);
                    let mut seq = 2;
                    while taken.contains(&slot) {
                        slot = intermediate_path(&bin.join(name), seq);
                        seq += 1;
                    }
                    taken.insert(slot.clone());
                    Some(slot)
                });
            batch.push(FileCommand::Delete(DeleteCmd::new(path.clone(), trash)));
        }
        self.run_batch(batch, reporter)
    }
    pub fn copy(
        &mut self,
        paths: &[PathBuf],
        dest_dir: &Path,
        reporter: &mut dyn ErrorReporter,
    ) -> Result<ExecReport> {
        let pairs = into_dir(paths, dest_dir);
        validate_pairs(&pairs)?;
        let mut batch = MacroCommand::new(CommandType::Copy);
        for (source, dest) in pairs {
            batch.push(FileCommand::Copy(CopyCmd::new(source, dest)));
        }
        self.run_batch(batch, reporter)
    }
    pub fn move_to(
        &mut self,
        paths: &[PathBuf],
        dest_dir: &Path,
        reporter: &mut dyn ErrorReporter,
    ) -> Result<ExecReport> {
        let pairs = into_dir(paths, dest_dir);
        validate_pairs(&pairs)?;
        let mut batch = MacroCommand::new(CommandType::Move);
        for (source, dest) in pairs {
            batch.push(FileCommand::Move(MoveCmd::new(source, dest)));
        }
        self.run_batch(batch, reporter)
    }
    pub fn create_folder(
        &mut self,
        path: &Path,
        reporter: &mut dyn ErrorReporter,
    ) -> Result<ExecReport> {
        let mut batch = MacroCommand::new(CommandType::CreateFolder);
        batch.push(FileCommand::CreateFolder(CreateFolderCmd::new(path)));
        self.run_batch(batch, reporter)
    }
    pub fn undo(&mut self, steps: usize, reporter: &mut dyn ErrorReporter) -> ExecReport {
        let mut trail = ExecutionTrail::new();
        let done = {
            let mut ctx = ExecContext::new(self.fs.as_ref(), reporter, &mut trail)
                .with_subject(&self.subject);
            self.model.undo(steps, &mut ctx)
        };
        if done < steps {
            info!("undid {} of {} requested step(s)", done, steps);
        }
        self.after_change();
        ExecReport::from_trail(done > 0, done, &trail)
    }
    pub fn redo(&mut self, steps: usize, reporter: &mut dyn ErrorReporter) -> ExecReport {
        let mut trail = ExecutionTrail::new();
        let done = {
            let mut ctx = ExecContext::new(self.fs.as_ref(), reporter, &mut trail)
                .with_subject(&self.subject);
            self.model.redo(steps, &mut ctx)
        };
        if done < steps {
            info!("redid {} of {} requested step(s)", done, steps);
        }
        self.after_change();
        ExecReport::from_trail(done > 0, done, &trail)
    }
    pub fn clear(&mut self) -> Result<()> {
        self.model.clear();
        self.store.remove_files()?;
        info!("history cleared");
        Ok(())
    }
    /// Writes both stacks in `format`, or the configured format when `None`.
    pub fn save_history(&self, format: Option<LogFormat>) -> Result<PathBuf> {
        let format = format.unwrap_or(self.config.history.log_format);
        let undo: Vec<&MacroCommand> = self.model.undo_stack().collect();
        let redo: Vec<&MacroCommand> = self.model.redo_stack().collect();
        self.store.try_save(format, &undo, &redo)
    }
    /// Replaces both stacks with whatever is on disk; returns the batch count.
    pub fn load_history(&mut self) -> usize {
        let loaded = self.store.load();
        self.model.replace_stacks(loaded.undo, loaded.redo);
        self.model.remove_expired_commands(self.config.history.max_commands);
        self.model.len()
    }
    pub fn history_lines(&self, verbosity: Verbosity) -> HistoryLines {
        let mut undo: Vec<String> = self
            .model
            .undo_stack()
            .map(|cmd| cmd.format(verbosity))
            .collect();
        let mut redo: Vec<String> = self
            .model
            .redo_stack()
            .map(|cmd| cmd.format(verbosity))
            .collect();
        undo.reverse();
        redo.reverse();
        HistoryLines { undo, redo }
    }
    fn run_batch(
        &mut self,
        batch: MacroCommand,
        reporter: &mut dyn ErrorReporter,
    ) -> Result<ExecReport> {
        if batch.is_zombie() {
            return Err(BatchError::Empty.into());
        }
        debug!("executing {}", batch.format(Verbosity::Detailed));
        let mut trail = ExecutionTrail::new();
        let succeeded = {
            let mut ctx = ExecContext::new(self.fs.as_ref(), reporter, &mut trail)
                .with_subject(&self.subject);
            self.model.execute(batch, &mut ctx)
        };
        self.after_change();
        Ok(ExecReport::from_trail(succeeded, usize::from(succeeded), &trail))
    }
    fn after_change(&mut self) {
        self.model.remove_expired_commands(self.config.history.max_commands);
        if self.config.history.autosave {
            let undo: Vec<&MacroCommand> = self.model.undo_stack().collect();
            let redo: Vec<&MacroCommand> = self.model.redo_stack().collect();
            self.store.save(self.config.history.log_format, &undo, &redo);
        }
    }
}
fn unique(paths: &[PathBuf]) -> Vec<&PathBuf> {
    let mut seen = HashSet::new();
    paths.iter().filter(|p| seen.insert(*p)).collect()
}
fn into_dir(paths: &[PathBuf], dest_dir: &Path) -> Vec<(PathBuf, PathBuf)> {
    paths
        .iter()
        .filter_map(|path| match path.file_name() {
            Some(name) => Some((path.clone(), dest_dir.join(name))),
            None => {
                warn!("skipping {:?}: no file name", path);
                None
            }
        })
        .collect()
}
