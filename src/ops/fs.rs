use serde::{Deserialize, Serialize};
use std::{
    fs, io, path::Path,
    time::{Duration, SystemTime, UNIX_EPOCH},
};
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
/// Timestamp and attribute snapshot; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStamp {
    pub modified: Option<SystemTime>,
    pub accessed: Option<SystemTime>,
    pub readonly: Option<bool>,
}
impl FileStamp {
    pub fn is_empty(&self) -> bool {
        self.modified.is_none() && self.accessed.is_none() && self.readonly.is_none()
    }
    /// Drops sub-second precision, which the text log cannot carry.
    pub fn whole_seconds(&self) -> Self {
        Self {
            modified: self.modified.map(truncate_to_second),
            accessed: self.accessed.map(truncate_to_second),
            readonly: self.readonly,
        }
    }
}
fn truncate_to_second(time: SystemTime) -> SystemTime {
    match time.duration_since(UNIX_EPOCH) {
        Ok(since) => UNIX_EPOCH + Duration::from_secs(since.as_secs()),
        Err(_) => time,
    }
}
/// The filesystem primitives the command engine orchestrates.
pub trait FileSystem {
    fn exists(&self, path: &Path) -> bool;
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
    fn copy(&self, from: &Path, to: &Path) -> io::Result<()>;
    fn remove(&self, path: &Path) -> io::Result<()>;
    fn create_dir(&self, path: &Path) -> io::Result<()>;
    fn stamp(&self, path: &Path) -> io::Result<FileStamp>;
    fn set_stamp(&self, path: &Path, stamp: &FileStamp) -> io::Result<()>;
}
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFs;
impl RealFs {
    fn refuse_existing(&self, to: &Path) -> io::Result<()> {
        if self.exists(to) {
            return Err(
                io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("destination already exists: {}", to.display()),
                ),
            );
        }
        Ok(())
    }
    fn set_readonly(path: &Path, readonly: bool) -> io::Result<()> {
        let mut perms = fs::metadata(path)?.permissions();
        #[cfg(unix)]
        {
            let mode = perms.mode();
            perms.set_mode(if readonly { mode & !0o222 } else { mode | 0o200 });
        }
        #[cfg(not(unix))]
        {
            perms.set_readonly(readonly);
        }
        fs::set_permissions(path, perms)
    }
    fn open_for_times(path: &Path) -> io::Result<fs::File> {
        #[cfg(windows)]
        {
            fs::OpenOptions::new().write(true).open(path)
        }
        #[cfg(not(windows))]
        {
            fs::File::open(path)
        }
    }
}
impl FileSystem for RealFs {
    fn exists(&self, path: &Path) -> bool {
        path.symlink_metadata().is_ok()
    }
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        if from != to {
            self.refuse_existing(to)?;
        }
        match fs::rename(from, to) {
            Err(err) if err.kind() == io::ErrorKind::CrossesDevices && from.is_file() => {
                fs::copy(from, to)?;
                fs::remove_file(from)
            }
            other => other,
        }
    }
    fn copy(&self, from: &Path, to: &Path) -> io::Result<()> {
        self.refuse_existing(to)?;
        if from.is_dir() {
            return Err(
                io::Error::new(
                    io::ErrorKind::Unsupported,
                    format!("cannot copy a directory: {}", from.display()),
                ),
            );
        }
        fs::copy(from, to).map(|_| ())
    }
    fn remove(&self, path: &Path) -> io::Result<()> {
        if path.is_dir() { fs::remove_dir(path) } else { fs::remove_file(path) }
    }
    fn create_dir(&self, path: &Path) -> io::Result<()> {
        fs::create_dir(path)
    }
    fn stamp(&self, path: &Path) -> io::Result<FileStamp> {
        let metadata = fs::metadata(path)?;
        Ok(FileStamp {
            modified: metadata.modified().ok(),
            accessed: metadata.accessed().ok(),
            readonly: Some(metadata.permissions().readonly()),
        })
    }
    fn set_stamp(&self, path: &Path, stamp: &FileStamp) -> io::Result<()> {
        let currently_readonly = fs::metadata(path)?.permissions().readonly();
        if stamp.readonly == Some(false) && currently_readonly {
            Self::set_readonly(path, false)?;
        }
        if stamp.modified.is_some() || stamp.accessed.is_some() {
            let mut times = fs::FileTimes::new();
            if let Some(modified) = stamp.modified {
                times = times.set_modified(modified);
            }
            if let Some(accessed) = stamp.accessed {
                times = times.set_accessed(accessed);
            }
            Self::open_for_times(path)?.set_times(times)?;
        }
        if stamp.readonly == Some(true) && !currently_readonly {
            Self::set_readonly(path, true)?;
        }
        Ok(())
    }
}
#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::{
        cell::RefCell, collections::HashMap, path::PathBuf,
    };
    /// Real filesystem that fails mutations touching chosen paths.
    #[derive(Default)]
    pub struct FaultyFs {
        inner: RealFs,
        failures: RefCell<HashMap<PathBuf, Option<u32>>>,
    }
    impl FaultyFs {
        pub fn new() -> Self {
            Self::default()
        }
        /// Fail `times` attempts, or every attempt when `None`.
        pub fn fail_on(&self, path: &Path, times: Option<u32>) {
            self.failures.borrow_mut().insert(path.to_path_buf(), times);
        }
        pub fn heal(&self, path: &Path) {
            self.failures.borrow_mut().remove(path);
        }
        fn check(&self, paths: &[&Path]) -> io::Result<()> {
            let mut failures = self.failures.borrow_mut();
            for path in paths {
                let remaining = match failures.get_mut(*path) {
                    Some(remaining) => remaining,
                    None => continue,
                };
                match remaining {
                    None => {}
                    Some(0) => continue,
                    Some(n) => *n -= 1,
                }
                return Err(
                    io::Error::new(io::ErrorKind::PermissionDenied, "injected failure"),
                );
            }
            Ok(())
        }
    }
    impl FileSystem for FaultyFs {
        fn exists(&self, path: &Path) -> bool {
            self.inner.exists(path)
        }
        fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
            self.check(&[from, to])?;
            self.inner.rename(from, to)
        }
        fn copy(&self, from: &Path, to: &Path) -> io::Result<()> {
            self.check(&[from, to])?;
            self.inner.copy(from, to)
        }
        fn remove(&self, path: &Path) -> io::Result<()> {
            self.check(&[path])?;
            self.inner.remove(path)
        }
        fn create_dir(&self, path: &Path) -> io::Result<()> {
            self.check(&[path])?;
            self.inner.create_dir(path)
        }
        fn stamp(&self, path: &Path) -> io::Result<FileStamp> {
            self.inner.stamp(path)
        }
        fn set_stamp(&self, path: &Path, stamp: &FileStamp) -> io::Result<()> {
            self.check(&[path])?;
            self.inner.set_stamp(path, stamp)
        }
    }
}
