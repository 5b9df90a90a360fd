use super::{fs::FileSystem, leaf::FileCommand, rename::RenameCmd};
use crate::{
    command::{CommandType, MacroCommand},
    errors::BatchError,
};
use log::debug;
use std::{
    collections::HashSet, path::{Path, PathBuf},
};
/// Rejects batches that name a source or a destination twice.
pub fn validate_pairs(pairs: &[(PathBuf, PathBuf)]) -> Result<(), BatchError> {
    if pairs.is_empty() {
        return Err(BatchError::Empty);
    }
    let mut sources = HashSet::new();
    let mut dests = HashSet::new();
    for (source, dest) in pairs {
        if !sources.insert(source) {
            return Err(BatchError::DuplicateSource(source.clone()));
        }
        if !dests.insert(dest) {
            return Err(BatchError::DuplicateDestination(dest.clone()));
        }
    }
    Ok(())
}
/// Builds a rename batch in which no rename ever targets an occupied path.
///
/// A destination that exists on disk must be vacated by another pair of the
/// same batch, otherwise the batch is refused before anything is touched.
/// A pair whose destination exists on disk, or was already claimed earlier in
/// the batch, is routed through a fresh `name-[N]` intermediate. The hop into
/// the intermediate runs in batch order; the hop out of it is deferred until
/// every first-pass rename has run.
pub fn build_rename_macro(
    pairs: &[(PathBuf, PathBuf)],
    fs: &dyn FileSystem,
) -> Result<MacroCommand, BatchError> {
    validate_pairs(pairs)?;
    let vacated: HashSet<&PathBuf> = pairs
        .iter()
        .filter(|(source, dest)| source != dest)
        .map(|(source, _)| source)
        .collect();
    for (source, dest) in pairs {
        if source != dest && !vacated.contains(dest) && fs.exists(dest) {
            return Err(BatchError::DestinationExists(dest.clone()));
        }
    }
    let mut claimed: HashSet<PathBuf> = HashSet::new();
    let mut first_pass = Vec::new();
    let mut deferred = Vec::new();
    for (source, dest) in pairs {
        if source == dest {
            debug!("skipping no-op rename of {}", source.display());
            continue;
        }
        let collides = fs.exists(dest) || claimed.contains(dest);
        if collides {
            let intermediate = unique_intermediate(dest, fs, &claimed);
            debug!(
                "{} collides, routing through {}", dest.display(), intermediate
                .display()
            );
            claimed.insert(intermediate.clone());
            first_pass.push(RenameCmd::new(source.clone(), intermediate.clone()));
            deferred.push(RenameCmd::new(intermediate, dest.clone()));
        } else {
            first_pass.push(RenameCmd::new(source.clone(), dest.clone()));
        }
        claimed.insert(dest.clone());
    }
    if first_pass.is_empty() {
        return Err(BatchError::Empty);
    }
    let mut batch = MacroCommand::new(CommandType::Rename);
    for cmd in first_pass.into_iter().chain(deferred) {
        batch.push(FileCommand::Rename(cmd));
    }
    Ok(batch)
}
pub fn intermediate_path(dest: &Path, seq: u32) -> PathBuf {
    let stem = dest
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match dest.extension() {
        Some(ext) => format!("{}-[{}].{}", stem, seq, ext.to_string_lossy()),
        None => format!("{}-[{}]", stem, seq),
    };
    dest.with_file_name(name)
}
fn unique_intermediate(dest: &Path, fs: &dyn FileSystem, claimed: &HashSet<PathBuf>) -> PathBuf {
    let mut seq = 2;
    loop {
        let candidate = intermediate_path(dest, seq);
        if !fs.exists(&candidate) && !claimed.contains(&candidate) {
            return candidate;
        }
        seq += 1;
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        command::{Command, ExecContext},
        errors::{ErrorReporter, Feedback, FileOpError},
        monitoring::ExecutionTrail, ops::RealFs,
    };
    use std::fs;
    use tempfile::tempdir;
    struct NoFailures;
    impl ErrorReporter for NoFailures {
        fn report_file_error(&mut self, error: &FileOpError) -> Feedback {
            panic!("unexpected failure: {}", error);
        }
        fn log_message(&mut self, _text: &str) {}
    }
    fn renames(batch: &MacroCommand) -> Vec<(PathBuf, PathBuf)> {
        batch
            .commands()
            .iter()
            .map(|cmd| match cmd {
                FileCommand::Rename(r) => (r.source.clone(), r.dest.clone()),
                other => panic!("unexpected leaf {:?}", other),
            })
            .collect()
    }
    fn run(batch: &mut MacroCommand) -> bool {
        let mut reporter = NoFailures;
        let mut trail = ExecutionTrail::new();
        let mut ctx = ExecContext::new(&RealFs, &mut reporter, &mut trail);
        batch.execute(&mut ctx)
    }
    #[test]
    fn test_intermediate_names() {
        assert_eq!(
            intermediate_path(Path::new("/d/b.txt"), 2), PathBuf::from("/d/b-[2].txt")
        );
        assert_eq!(intermediate_path(Path::new("/d/README"), 3), PathBuf::from("/d/README-[3]"));
    }
    #[test]
    fn test_swap_routes_through_intermediates() {
        let temp_dir = tempdir().unwrap();
        let a = temp_dir.path().join("a.txt");
        let b = temp_dir.path().join("b.txt");
        fs::write(&a, "content of a").unwrap();
        fs::write(&b, "content of b").unwrap();
        let pairs = vec![(a.clone(), b.clone()), (b.clone(), a.clone())];
        let mut batch = build_rename_macro(&pairs, &RealFs).unwrap();
        assert_eq!(batch.len(), 4);
        assert!(run(&mut batch));
        assert_eq!(fs::read_to_string(&a).unwrap(), "content of b");
        assert_eq!(fs::read_to_string(&b).unwrap(), "content of a");
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 2);
    }
    #[test]
    fn test_two_sources_one_destination_rejected() {
        let pairs = vec![
            (PathBuf::from("/d/a"), PathBuf::from("/d/x")),
            (PathBuf::from("/d/b"), PathBuf::from("/d/x")),
        ];
        assert_eq!(
            build_rename_macro(&pairs, &RealFs).unwrap_err(),
            BatchError::DuplicateDestination(PathBuf::from("/d/x"))
        );
        let pairs = vec![
            (PathBuf::from("/d/a"), PathBuf::from("/d/x")),
            (PathBuf::from("/d/a"), PathBuf::from("/d/y")),
        ];
        assert_eq!(
            validate_pairs(&pairs).unwrap_err(), BatchError::DuplicateSource(PathBuf::from("/d/a"))
        );
        assert_eq!(validate_pairs(&[]).unwrap_err(), BatchError::Empty);
    }
    #[test]
    fn test_chain_defers_only_colliding_pair() {
        let temp_dir = tempdir().unwrap();
        let a = temp_dir.path().join("a.txt");
        let b = temp_dir.path().join("b.txt");
        let c = temp_dir.path().join("c.txt");
        fs::write(&a, "a").unwrap();
        fs::write(&b, "b").unwrap();
        let pairs = vec![(a.clone(), b.clone()), (b.clone(), c.clone())];
        let mut batch = build_rename_macro(&pairs, &RealFs).unwrap();
        let b2 = temp_dir.path().join("b-[2].txt");
        assert_eq!(
            renames(& batch), vec![(a.clone(), b2.clone()), (b.clone(), c.clone()), (b2,
            b.clone())]
        );
        assert!(run(&mut batch));
        assert_eq!(fs::read_to_string(&b).unwrap(), "a");
        assert_eq!(fs::read_to_string(&c).unwrap(), "b");
        assert!(!a.exists());
    }
    #[test]
    fn test_occupied_destination_outside_batch_rejected() {
        let temp_dir = tempdir().unwrap();
        let a = temp_dir.path().join("a.txt");
        let x = temp_dir.path().join("x.txt");
        fs::write(&a, "a").unwrap();
        fs::write(&x, "unrelated").unwrap();
        let pairs = vec![(a.clone(), x.clone())];
        assert_eq!(
            build_rename_macro(&pairs, &RealFs).unwrap_err(),
            BatchError::DestinationExists(x.clone())
        );
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 2);
        assert_eq!(fs::read_to_string(&x).unwrap(), "unrelated");
        let y = temp_dir.path().join("y.txt");
        let pairs = vec![(a.clone(), x.clone()), (x.clone(), y.clone())];
        assert!(build_rename_macro(&pairs, &RealFs).is_ok());
    }
    #[test]
    fn test_intermediate_probe_skips_taken_names() {
        let temp_dir = tempdir().unwrap();
        let a = temp_dir.path().join("a.txt");
        let b = temp_dir.path().join("b.txt");
        fs::write(&a, "a").unwrap();
        fs::write(&b, "b").unwrap();
        fs::write(temp_dir.path().join("b-[2].txt"), "taken").unwrap();
        let pairs = vec![(a.clone(), b.clone()), (b.clone(), a.clone())];
        let batch = build_rename_macro(&pairs, &RealFs).unwrap();
        let plan = renames(&batch);
        assert_eq!(plan[0], (a.clone(), temp_dir.path().join("b-[3].txt")));
        assert_eq!(plan[1], (b.clone(), temp_dir.path().join("a-[2].txt")));
        assert_eq!(plan[2], (temp_dir.path().join("b-[3].txt"), b.clone()));
        assert_eq!(plan[3], (temp_dir.path().join("a-[2].txt"), a));
    }
    #[test]
    fn test_noop_pairs_skipped() {
        let pairs = vec![(PathBuf::from("/d/same"), PathBuf::from("/d/same"))];
        assert_eq!(build_rename_macro(&pairs, &RealFs).unwrap_err(), BatchError::Empty);
    }
}
