#[cfg(test)]
mod tests {
    use crate::{
        command::{CommandType, Verbosity},
        errors::{BatchError, ErrorReporter, Feedback, FileOpError, PolicyReporter},
        ops::{testing::FaultyFs, FileStamp},
        LogFormat, UndoManager,
    };
    use std::{collections::VecDeque, fs, path::{Path, PathBuf}};
    use tempfile::tempdir;
    struct Scripted {
        answers: VecDeque<Feedback>,
        prompts: usize,
    }
    impl Scripted {
        fn new(answers: &[Feedback]) -> Self {
            Self {
                answers: answers.iter().copied().collect(),
                prompts: 0,
            }
        }
    }
    impl ErrorReporter for Scripted {
        fn report_file_error(&mut self, _error: &FileOpError) -> Feedback {
            self.prompts += 1;
            self.answers.pop_front().unwrap_or(Feedback::Abort)
        }
        fn log_message(&mut self, _text: &str) {}
    }
    fn open(root: &Path) -> UndoManager {
        UndoManager::open(root.join("home")).unwrap()
    }
    fn write_files(dir: &Path, names: &[&str]) -> Vec<PathBuf> {
        names
            .iter()
            .map(|name| {
                let path = dir.join(name);
                fs::write(&path, format!("content of {}", name)).unwrap();
                path
            })
            .collect()
    }
    #[test]
    fn test_swap_undo_redo_workflow() {
        let temp_dir = tempdir().unwrap();
        let files = write_files(temp_dir.path(), &["a.txt", "b.txt"]);
        let mut manager = open(temp_dir.path());
        let mut reporter = Scripted::new(&[]);
        let pairs = vec![
            (files[0].clone(), files[1].clone()), (files[1].clone(), files[0].clone()),
        ];
        let report = manager.rename(&pairs, &mut reporter).unwrap();
        assert!(report.succeeded);
        assert_eq!(report.summary, "4 succeeded");
        assert_eq!(fs::read_to_string(&files[0]).unwrap(), "content of b.txt");
        assert!(manager.can_undo());
        let undone = manager.undo(1, &mut reporter);
        assert_eq!(undone.steps, 1);
        assert_eq!(fs::read_to_string(&files[0]).unwrap(), "content of a.txt");
        assert_eq!(fs::read_to_string(&files[1]).unwrap(), "content of b.txt");
        assert!(manager.can_redo());
        let redone = manager.redo(3, &mut reporter);
        assert_eq!(redone.steps, 1);
        assert_eq!(fs::read_to_string(&files[1]).unwrap(), "content of a.txt");
        assert_eq!(reporter.prompts, 0);
    }
    #[test]
    fn test_history_survives_restart() {
        let temp_dir = tempdir().unwrap();
        let files = write_files(temp_dir.path(), &["one.txt", "two.txt"]);
        let detailed = {
            let mut manager = open(temp_dir.path());
            let mut reporter = Scripted::new(&[]);
            manager
                .rename(&[(files[0].clone(), temp_dir.path().join("uno.txt"))], &mut reporter)
                .unwrap();
            manager
                .rename(&[(files[1].clone(), temp_dir.path().join("dos.txt"))], &mut reporter)
                .unwrap();
            manager.undo(1, &mut reporter);
            manager.history_lines(Verbosity::Detailed)
        };
        let mut manager = open(temp_dir.path());
        let reloaded = manager.history_lines(Verbosity::Detailed);
        assert_eq!(reloaded.undo, detailed.undo);
        assert_eq!(reloaded.redo, detailed.redo);
        let mut reporter = Scripted::new(&[]);
        assert_eq!(manager.redo(1, &mut reporter).steps, 1);
        assert!(temp_dir.path().join("dos.txt").exists());
    }
    #[test]
    fn test_binary_history_survives_restart() {
        let temp_dir = tempdir().unwrap();
        let files = write_files(temp_dir.path(), &["x.txt"]);
        {
            let mut manager = open(temp_dir.path());
            manager
                .update_config(|config| config.history.log_format = LogFormat::Binary)
                .unwrap();
            let mut reporter = Scripted::new(&[]);
            manager
                .copy(&files, &temp_dir.path().join("home"), &mut reporter)
                .unwrap();
        }
        let manager = open(temp_dir.path());
        assert_eq!(manager.config().history.log_format, LogFormat::Binary);
        assert!(temp_dir.path().join("home/logs/history.bin").exists());
        assert_eq!(manager.model().undo_len(), 1);
        assert_eq!(
            manager.model().peek_undo().map(|c| c.kind()), Some(CommandType::Copy)
        );
    }
    #[test]
    fn test_partial_failure_keeps_survivors() {
        let temp_dir = tempdir().unwrap();
        let files = write_files(temp_dir.path(), &["1.txt", "2.txt", "3.txt"]);
        let mut manager = open(temp_dir.path());
        let faulty = FaultyFs::new();
        faulty.fail_on(&files[1], None);
        manager.set_file_system(Box::new(faulty));
        let pairs: Vec<(PathBuf, PathBuf)> = files
            .iter()
            .map(|f| (f.clone(), f.with_extension("md")))
            .collect();
        let mut reporter = Scripted::new(&[Feedback::Retry, Feedback::Ignore]);
        let report = manager.rename(&pairs, &mut reporter).unwrap();
        assert!(report.succeeded);
        assert_eq!(reporter.prompts, 2);
        assert_eq!(report.summary, "2 succeeded, 2 failed");
        let batch = manager.model().peek_undo().unwrap();
        assert_eq!(batch.len(), 2);
        assert!(files[1].exists());
        assert!(temp_dir.path().join("3.md").exists());
    }
    #[test]
    fn test_policy_reporter_skips_missing_files() {
        let temp_dir = tempdir().unwrap();
        let files = write_files(temp_dir.path(), &["real.txt"]);
        let mut manager = open(temp_dir.path());
        let mut reporter = PolicyReporter::new();
        let paths = vec![temp_dir.path().join("ghost.txt"), files[0].clone()];
        let dest = temp_dir.path().join("dest");
        fs::create_dir(&dest).unwrap();
        let report = manager.move_to(&paths, &dest, &mut reporter).unwrap();
        assert!(report.succeeded);
        assert_eq!(manager.model().peek_undo().unwrap().len(), 1);
        assert!(dest.join("real.txt").exists());
        manager.undo(1, &mut reporter);
        assert!(files[0].exists());
        assert!(!dest.join("real.txt").exists());
    }
    #[test]
    fn test_trash_delete_is_undoable() {
        let temp_dir = tempdir().unwrap();
        let files = write_files(temp_dir.path(), &["keep.txt", "also.txt"]);
        let mut manager = open(temp_dir.path());
        let mut reporter = Scripted::new(&[]);
        manager.delete(&files, false, &mut reporter).unwrap();
        assert!(files.iter().all(|f| !f.exists()));
        assert_eq!(manager.undo(1, &mut reporter).steps, 1);
        assert_eq!(fs::read_to_string(&files[0]).unwrap(), "content of keep.txt");
        assert!(files[1].exists());
    }
    #[test]
    fn test_permanent_delete_cannot_be_undone() {
        let temp_dir = tempdir().unwrap();
        let files = write_files(temp_dir.path(), &["gone.txt"]);
        let mut manager = open(temp_dir.path());
        let mut reporter = Scripted::new(&[]);
        manager.delete(&files, true, &mut reporter).unwrap();
        assert!(!files[0].exists());
        assert!(manager.can_undo());
        let report = manager.undo(1, &mut reporter);
        assert_eq!(report.steps, 0);
        assert!(!manager.can_undo());
        assert!(!manager.can_redo());
    }
    #[test]
    fn test_touch_and_create_folder_round_trip() {
        let temp_dir = tempdir().unwrap();
        let files = write_files(temp_dir.path(), &["t.txt"]);
        let mut manager = open(temp_dir.path());
        let mut reporter = Scripted::new(&[]);
        let spec = FileStamp {
            readonly: Some(true),
            ..Default::default()
        };
        manager.touch(&files, &spec, &mut reporter).unwrap();
        assert!(fs::metadata(&files[0]).unwrap().permissions().readonly());
        let folder = temp_dir.path().join("made");
        manager.create_folder(&folder, &mut reporter).unwrap();
        assert!(folder.is_dir());
        assert_eq!(manager.undo(2, &mut reporter).steps, 2);
        assert!(!folder.exists());
        assert!(!fs::metadata(&files[0]).unwrap().permissions().readonly());
        let lines = manager.history_lines(Verbosity::Summary);
        assert_eq!(lines.redo.len(), 2);
        assert!(lines.redo[0].contains("Touch t.txt (read-only)"));
    }
    #[test]
    fn test_touch_undo_after_restart_restores_snapshot() {
        use std::time::{Duration, SystemTime};
        let temp_dir = tempdir().unwrap();
        let files = write_files(temp_dir.path(), &["stamped.txt"]);
        let original = SystemTime::UNIX_EPOCH + Duration::from_millis(1_600_000_000_250);
        fs::File::options()
            .write(true)
            .open(&files[0])
            .unwrap()
            .set_modified(original)
            .unwrap();
        {
            let mut manager = open(temp_dir.path());
            let mut reporter = Scripted::new(&[]);
            let spec = FileStamp {
                modified: Some(SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000)),
                ..Default::default()
            };
            manager.touch(&files, &spec, &mut reporter).unwrap();
        }
        let mut manager = open(temp_dir.path());
        let mut reporter = Scripted::new(&[]);
        let before_undo = manager.history_lines(Verbosity::Detailed);
        assert_eq!(manager.undo(1, &mut reporter).steps, 1);
        let restored = fs::metadata(&files[0]).unwrap().modified().unwrap();
        assert_eq!(restored, SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000));
        manager.redo(1, &mut reporter);
        assert_eq!(manager.history_lines(Verbosity::Detailed).undo, before_undo.undo);
    }
    #[test]
    fn test_rejected_batches_touch_nothing() {
        let temp_dir = tempdir().unwrap();
        let files = write_files(temp_dir.path(), &["a", "b"]);
        let mut manager = open(temp_dir.path());
        let mut reporter = Scripted::new(&[]);
        let err = manager.rename(&[], &mut reporter).unwrap_err();
        assert_eq!(err.downcast_ref::<BatchError>(), Some(&BatchError::Empty));
        let target = temp_dir.path().join("x");
        let pairs = vec![(files[0].clone(), target.clone()), (files[1].clone(), target.clone())];
        let err = manager.rename(&pairs, &mut reporter).unwrap_err();
        assert_eq!(
            err.downcast_ref::<BatchError>(), Some(&BatchError::DuplicateDestination(target))
        );
        assert!(files.iter().all(|f| f.exists()));
        let mut policy = PolicyReporter::new();
        let err = manager.rename(&[(files[0].clone(), files[1].clone())], &mut policy).unwrap_err();
        assert_eq!(
            err.downcast_ref::<BatchError>(), Some(&BatchError::DestinationExists(files[1].clone()))
        );
        assert_eq!(fs::read_to_string(&files[1]).unwrap(), "content of b");
        assert!(files[0].exists());
        assert!(!temp_dir.path().join("b-[2]").exists());
        assert!(!manager.can_undo());
    }
    #[test]
    fn test_capacity_trims_oldest_batches() {
        let temp_dir = tempdir().unwrap();
        let mut manager = open(temp_dir.path());
        manager.update_config(|config| config.history.max_commands = 2).unwrap();
        let mut reporter = Scripted::new(&[]);
        for name in ["d1", "d2", "d3"] {
            manager.create_folder(&temp_dir.path().join(name), &mut reporter).unwrap();
        }
        assert_eq!(manager.model().len(), 2);
        let lines = manager.history_lines(Verbosity::Detailed);
        assert!(lines.undo[0].contains("d3"));
        assert!(lines.undo[1].contains("d2"));
        manager.clear().unwrap();
        assert!(manager.model().is_empty());
        assert!(open(temp_dir.path()).model().is_empty());
    }
}
