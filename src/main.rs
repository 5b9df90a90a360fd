use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueHint};
use env_logger::Env;
use fundo::{
    command::{parse_system_time, Verbosity},
    errors::{ConsolePrompt, ErrorReporter, PolicyReporter},
    monitoring::ConsoleObserver, ExecReport, LogFormat, TouchSpec, UndoManager,
};
use log::{debug, warn, LevelFilter};
use std::{path::PathBuf, time::SystemTime};
#[derive(Parser, Debug)]
#[command(
    name = "fundo",
    author,
    version,
    about = "Batch file operations with a persistent undo/redo history",
    long_about = r#"
Fundo - Undoable Batch File Operations

Every fundo command runs as one batch. A batch can be undone and redone as a
single step, and the history survives restarts in a text or binary log.

EXAMPLES:
  fundo rename a.txt b.txt b.txt a.txt    # Swap two files in one step
  fundo touch '*.log' --modified now      # Bump modification times
  fundo delete old/*.tmp                  # Delete into the fundo trash
  fundo copy report.pdf notes.md backup/  # Copy files into a directory
  fundo move draft.md archive/            # Move files into a directory
  fundo mkdir projects/new                # Create a folder
  fundo undo -n 2                         # Undo the last two batches
  fundo redo                              # Redo the last undone batch
  fundo history --detailed                # Show every batch and its files
  fundo save --format binary              # Write the history as a binary log
  fundo settings show                     # Display current configuration

For more information on any command, use: fundo <command> --help
    "#
)]
struct Opt {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[arg(
        short,
        long,
        global = true,
        help = "Answer failures from the recovery policy instead of prompting",
        long_help = "Missing files are skipped and permission errors are retried twice \
                    before being skipped. Without this flag every failure stops and \
                    asks whether to retry, ignore or abort."
    )]
    yes: bool,
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        value_hint = ValueHint::DirPath,
        help = "Use a different fundo home directory"
    )]
    home: Option<PathBuf>,
}
#[derive(Subcommand, Debug)]
enum Commands {
    Rename {
        #[arg(
            value_name = "SRC DEST",
            num_args = 2..,
            required = true,
            value_hint = ValueHint::AnyPath,
            help = "Source and destination paths, in pairs",
            long_help = "Pairs of paths. Swaps and chains are allowed: colliding \
                        destinations are routed through temporary names so no \
                        file is ever overwritten."
        )]
        paths: Vec<String>,
    },
    Touch {
        #[arg(value_name = "PATH", required = true, value_hint = ValueHint::AnyPath)]
        paths: Vec<String>,
        #[arg(
            long,
            value_name = "TIME",
            value_parser = parse_time_arg,
            help = "New modification time (DD-MM-YYYY HH:MM:SS or 'now')"
        )]
        modified: Option<SystemTime>,
        #[arg(
            long,
            value_name = "TIME",
            value_parser = parse_time_arg,
            help = "New access time (DD-MM-YYYY HH:MM:SS or 'now')"
        )]
        accessed: Option<SystemTime>,
        #[arg(long, value_name = "BOOL", help = "Set or clear the read-only flag")]
        readonly: Option<bool>,
    },
    Delete {
        #[arg(value_name = "PATH", required = true, value_hint = ValueHint::AnyPath)]
        paths: Vec<String>,
        #[arg(
            long,
            help = "Delete for good instead of moving to the trash",
            long_help = "Permanently deleted files cannot be restored, so the batch \
                        cannot be undone."
        )]
        permanent: bool,
    },
    Copy {
        #[arg(
            value_name = "SRC... DEST_DIR",
            num_args = 2..,
            required = true,
            value_hint = ValueHint::AnyPath
        )]
        paths: Vec<String>,
    },
    Move {
        #[arg(
            value_name = "SRC... DEST_DIR",
            num_args = 2..,
            required = true,
            value_hint = ValueHint::AnyPath
        )]
        paths: Vec<String>,
    },
    Mkdir {
        #[arg(value_name = "PATH", value_hint = ValueHint::DirPath)]
        path: PathBuf,
    },
    Undo {
        #[arg(short = 'n', long, value_name = "STEPS", default_value = "1")]
        steps: usize,
    },
    Redo {
        #[arg(short = 'n', long, value_name = "STEPS", default_value = "1")]
        steps: usize,
    },
    History {
        #[arg(short, long, help = "List every file operation of each batch")]
        detailed: bool,
    },
    Clear,
    Save {
        #[arg(long, value_name = "FORMAT", help = "text or binary; defaults to the configured format")]
        format: Option<LogFormat>,
    },
    Settings { #[command(subcommand)] action: SettingsCommand },
}
#[derive(Subcommand, Debug)]
enum SettingsCommand {
    Show,
    History {
        #[arg(long)]
        max_commands: Option<usize>,
        #[arg(long)]
        format: Option<LogFormat>,
        #[arg(long)]
        autosave: Option<bool>,
        #[arg(long)]
        compression: Option<u8>,
    },
    Trash { #[arg(long)] enabled: Option<bool> },
    Init,
}
fn main() -> Result<()> {
    let opt = Opt::parse();
    let log_level = match opt.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::from_env(
            Env::default().default_filter_or(log_level.to_string()),
        )
        .init();
    let mut reporter: Box<dyn ErrorReporter> = if opt.yes {
        Box::new(PolicyReporter::new())
    } else {
        Box::new(ConsolePrompt::stdio())
    };
    let home = opt.home;
    match opt.command {
        Commands::Rename { paths } => {
            handle_rename(home, paths, reporter.as_mut())?;
        }
        Commands::Touch { paths, modified, accessed, readonly } => {
            let spec = TouchSpec {
                modified,
                accessed,
                readonly,
            };
            handle_touch(home, paths, spec, reporter.as_mut())?;
        }
        Commands::Delete { paths, permanent } => {
            handle_delete(home, paths, permanent, reporter.as_mut())?;
        }
        Commands::Copy { paths } => {
            handle_transfer(home, paths, false, reporter.as_mut())?;
        }
        Commands::Move { paths } => {
            handle_transfer(home, paths, true, reporter.as_mut())?;
        }
        Commands::Mkdir { path } => {
            handle_mkdir(home, path, reporter.as_mut())?;
        }
        Commands::Undo { steps } => {
            handle_undo(home, steps, reporter.as_mut())?;
        }
        Commands::Redo { steps } => {
            handle_redo(home, steps, reporter.as_mut())?;
        }
        Commands::History { detailed } => {
            handle_history(home, detailed)?;
        }
        Commands::Clear => {
            handle_clear(home)?;
        }
        Commands::Save { format } => {
            handle_save(home, format)?;
        }
        Commands::Settings { action } => {
            handle_settings(home, action)?;
        }
    }
    Ok(())
}
fn open_manager(home: Option<PathBuf>) -> Result<UndoManager> {
    let mut manager = match home {
        Some(home) => UndoManager::open(home)?,
        None => UndoManager::new()?,
    };
    manager.subscribe(Box::new(ConsoleObserver));
    Ok(manager)
}
fn parse_time_arg(text: &str) -> Result<SystemTime, String> {
    if text.eq_ignore_ascii_case("now") {
        return Ok(SystemTime::now());
    }
    parse_system_time(text)
        .ok_or_else(|| format!("'{}' is not a DD-MM-YYYY HH:MM:SS time", text))
}
/// Existing paths are taken literally; anything else with glob metacharacters is expanded.
fn expand_paths(args: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for arg in args {
        let literal = PathBuf::from(arg);
        let is_pattern = arg.contains(&['*', '?', '['][..]);
        if literal.exists() || !is_pattern {
            paths.push(absolute(literal)?);
            continue;
        }
        let mut matched = 0;
        for entry in glob::glob(arg).with_context(|| format!("invalid pattern '{}'", arg))? {
            match entry {
                Ok(path) => {
                    paths.push(absolute(path)?);
                    matched += 1;
                }
                Err(e) => warn!("cannot read {:?}: {}", e.path(), e.error()),
            }
        }
        if matched == 0 {
            warn!("pattern '{}' matched nothing", arg);
        }
        debug!("'{}' expanded to {} path(s)", arg, matched);
    }
    Ok(paths)
}
fn absolute(path: PathBuf) -> Result<PathBuf> {
    std::path::absolute(&path).with_context(|| format!("cannot resolve {:?}", path))
}
fn print_report(report: &ExecReport) {
    if report.entries.is_empty() && !report.succeeded {
        println!("Nothing to do.");
        return;
    }
    println!("{}", report.summary);
    for entry in report.entries.iter().filter(|e| e.error.is_some()) {
        println!(
            "  ✗ {}: {}", entry.description, entry.error.as_deref().unwrap_or_default()
        );
    }
}
fn handle_rename(
    home: Option<PathBuf>,
    paths: Vec<String>,
    reporter: &mut dyn ErrorReporter,
) -> Result<()> {
    if paths.len() % 2 != 0 {
        bail!("rename takes SRC DEST pairs, got {} path(s)", paths.len());
    }
    let mut pairs = Vec::new();
    for pair in paths.chunks(2) {
        pairs.push((absolute(PathBuf::from(&pair[0]))?, absolute(PathBuf::from(&pair[1]))?));
    }
    let mut manager = open_manager(home)?;
    let report = manager.rename(&pairs, reporter)?;
    print_report(&report);
    Ok(())
}
fn handle_touch(
    home: Option<PathBuf>,
    paths: Vec<String>,
    spec: TouchSpec,
    reporter: &mut dyn ErrorReporter,
) -> Result<()> {
    if spec.is_empty() {
        bail!("nothing to change: pass --modified, --accessed or --readonly");
    }
    let paths = expand_paths(&paths)?;
    let mut manager = open_manager(home)?;
    let report = manager.touch(&paths, &spec, reporter)?;
    print_report(&report);
    Ok(())
}
fn handle_delete(
    home: Option<PathBuf>,
    paths: Vec<String>,
    permanent: bool,
    reporter: &mut dyn ErrorReporter,
) -> Result<()> {
    let paths = expand_paths(&paths)?;
    let mut manager = open_manager(home)?;
    if permanent || !manager.config().trash.enabled {
        println!("Deleting permanently; this batch cannot be undone.");
    }
    let report = manager.delete(&paths, permanent, reporter)?;
    print_report(&report);
    Ok(())
}
fn handle_transfer(
    home: Option<PathBuf>,
    mut paths: Vec<String>,
    moving: bool,
    reporter: &mut dyn ErrorReporter,
) -> Result<()> {
    let Some(dest_dir) = paths.pop() else {
        bail!("missing destination directory");
    };
    let dest_dir = absolute(PathBuf::from(dest_dir))?;
    if !dest_dir.is_dir() {
        bail!("{:?} is not a directory", dest_dir);
    }
    let sources = expand_paths(&paths)?;
    let mut manager = open_manager(home)?;
    let report = if moving {
        manager.move_to(&sources, &dest_dir, reporter)?
    } else {
        manager.copy(&sources, &dest_dir, reporter)?
    };
    print_report(&report);
    Ok(())
}
fn handle_mkdir(
    home: Option<PathBuf>,
    path: PathBuf,
    reporter: &mut dyn ErrorReporter,
) -> Result<()> {
    let path = absolute(path)?;
    let mut manager = open_manager(home)?;
    let report = manager.create_folder(&path, reporter)?;
    print_report(&report);
    Ok(())
}
fn handle_undo(
    home: Option<PathBuf>,
    steps: usize,
    reporter: &mut dyn ErrorReporter,
) -> Result<()> {
    let mut manager = open_manager(home)?;
    if !manager.can_undo() {
        println!("Nothing to undo.");
        return Ok(());
    }
    let report = manager.undo(steps, reporter);
    println!("Undid {} of {} batch(es).", report.steps, steps);
    print_report(&report);
    Ok(())
}
fn handle_redo(
    home: Option<PathBuf>,
    steps: usize,
    reporter: &mut dyn ErrorReporter,
) -> Result<()> {
    let mut manager = open_manager(home)?;
    if !manager.can_redo() {
        println!("Nothing to redo.");
        return Ok(());
    }
    let report = manager.redo(steps, reporter);
    println!("Redid {} of {} batch(es).", report.steps, steps);
    print_report(&report);
    Ok(())
}
fn handle_history(home: Option<PathBuf>, detailed: bool) -> Result<()> {
    let manager = open_manager(home)?;
    let verbosity = if detailed { Verbosity::Detailed } else { Verbosity::Summary };
    let lines = manager.history_lines(verbosity);
    if lines.undo.is_empty() && lines.redo.is_empty() {
        println!("History is empty.");
        return Ok(());
    }
    println!("Undo stack (most recent first):");
    println!("===============================");
    for (index, line) in lines.undo.iter().enumerate() {
        println!("{:>3}. {}", index + 1, line);
    }
    if !lines.redo.is_empty() {
        println!();
        println!("Redo stack (next first):");
        println!("========================");
        for (index, line) in lines.redo.iter().enumerate() {
            println!("{:>3}. {}", index + 1, line);
        }
    }
    Ok(())
}
fn handle_clear(home: Option<PathBuf>) -> Result<()> {
    let mut manager = open_manager(home)?;
    manager.clear()?;
    println!("History cleared");
    Ok(())
}
fn handle_save(home: Option<PathBuf>, format: Option<LogFormat>) -> Result<()> {
    let manager = open_manager(home)?;
    let path = manager.save_history(format)?;
    println!("History saved to {}", path.display());
    Ok(())
}
fn handle_settings(home: Option<PathBuf>, action: SettingsCommand) -> Result<()> {
    let mut manager = open_manager(home)?;
    match action {
        SettingsCommand::Show => {
            let config = manager.config();
            println!("Current settings:");
            println!("Home directory: {:?}", config.home_dir);
            println!("History:");
            println!("  Max commands: {}", config.history.max_commands);
            println!("  Log format: {}", config.history.log_format);
            println!("  Autosave: {}", config.history.autosave);
            println!("  Compression: {}", config.history.compression);
            println!("Trash:");
            println!("  Enabled: {}", config.trash.enabled);
        }
        SettingsCommand::History { max_commands, format, autosave, compression } => {
            manager
                .update_config(|config| {
                if let Some(mc) = max_commands {
                    config.history.max_commands = mc;
                }
                if let Some(f) = format {
                    config.history.log_format = f;
                }
                if let Some(a) = autosave {
                    config.history.autosave = a;
                }
                if let Some(c) = compression {
                    config.history.compression = c;
                }
            })?;
            println!("History settings updated");
        }
        SettingsCommand::Trash { enabled } => {
            manager
                .update_config(|config| {
                if let Some(e) = enabled {
                    config.trash.enabled = e;
                }
            })?;
            println!("Trash settings updated");
        }
        SettingsCommand::Init => {
            let home_dir = manager.config().home_dir.clone();
            UndoManager::setup_directory_structure(&home_dir)?;
            manager.save_config()?;
            println!("Directory structure initialized at {}", home_dir.display());
        }
    }
    Ok(())
}
