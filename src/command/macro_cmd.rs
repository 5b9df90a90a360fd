use super::{
    context::{run_leaf, ExecContext, LeafOutcome},
    types::{format_timestamp, now_timestamp, Command, CommandType, Verbosity},
};
use crate::ops::FileCommand;
use chrono::NaiveDateTime;
use log::debug;
use serde::{Deserialize, Serialize};
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}
/// An ordered batch of leaves executed and reversed as one undo step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroCommand {
    kind: CommandType,
    timestamp: NaiveDateTime,
    commands: Vec<FileCommand>,
    main: Option<usize>,
}
impl MacroCommand {
    pub fn new(kind: CommandType) -> Self {
        Self::with_timestamp(kind, now_timestamp())
    }
    pub fn with_timestamp(kind: CommandType, timestamp: NaiveDateTime) -> Self {
        Self {
            kind,
            timestamp,
            commands: Vec::new(),
            main: None,
        }
    }
    pub fn push(&mut self, command: FileCommand) {
        self.commands.push(command);
    }
    pub fn set_main(&mut self, index: usize) -> bool {
        if index < self.commands.len() {
            self.main = Some(index);
            true
        } else {
            false
        }
    }
    pub fn main_index(&self) -> Option<usize> {
        self.main
    }
    /// The leaf used for one-line descriptions; the first one unless chosen.
    pub fn main_command(&self) -> Option<&FileCommand> {
        self.main.and_then(|i| self.commands.get(i)).or_else(|| self.commands.first())
    }
    pub fn commands(&self) -> &[FileCommand] {
        &self.commands
    }
    pub fn len(&self) -> usize {
        self.commands.len()
    }
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
    pub fn kind(&self) -> CommandType {
        self.kind
    }
    pub fn timestamp(&self) -> &NaiveDateTime {
        &self.timestamp
    }
    /// `<KEY DD-MM-YYYY HH:MM:SS> [n]`
    pub fn header(&self) -> String {
        format!(
            "<{} {}> [{}]", self.kind.key(), format_timestamp(& self.timestamp), self
            .commands.len()
        )
    }
    fn run(&mut self, ctx: &mut ExecContext<'_>, direction: Direction) -> bool {
        let order: Vec<usize> = match direction {
            Direction::Forward => (0..self.commands.len()).collect(),
            Direction::Backward => (0..self.commands.len()).rev().collect(),
        };
        let mut keep = vec![true; self.commands.len()];
        let mut succeeded = 0;
        for (pos, &index) in order.iter().enumerate() {
            let outcome = match direction {
                Direction::Forward => run_leaf(&self.commands[index], ctx),
                Direction::Backward => {
                    match self.commands[index].make_unexecute_cmd() {
                        Some(reverse) => run_leaf(&reverse, ctx),
                        None => {
                            debug!(
                                "cannot reverse {}", self.commands[index]
                                .format(Verbosity::Detailed)
                            );
                            keep[index] = false;
                            continue;
                        }
                    }
                }
            };
            match outcome {
                LeafOutcome::Succeeded => succeeded += 1,
                LeafOutcome::Ignored => keep[index] = false,
                LeafOutcome::Aborted => {
                    for &rest in &order[pos..] {
                        keep[rest] = false;
                    }
                    break;
                }
            }
        }
        self.discard(&keep);
        debug!(
            "{} finished: {} succeeded, {} kept", self.header(), succeeded, self
            .commands.len()
        );
        succeeded > 0
    }
    fn discard(&mut self, keep: &[bool]) {
        if keep.iter().all(|k| *k) {
            return;
        }
        self.main = match self.main {
            Some(main) if keep[main] => Some(keep[..main].iter().filter(|k| **k).count()),
            _ => None,
        };
        let mut flags = keep.iter();
        self.commands.retain(|_| flags.next().copied().unwrap_or(false));
    }
}
impl Command for MacroCommand {
    fn command_type(&self) -> CommandType {
        self.kind
    }
    fn execute(&mut self, ctx: &mut ExecContext<'_>) -> bool {
        ctx.log_message(&self.format(Verbosity::Summary));
        let done = self.run(ctx, Direction::Forward);
        if done {
            ctx.notify(&*self);
        }
        done
    }
    fn unexecute(&mut self, ctx: &mut ExecContext<'_>) -> bool {
        ctx.log_message(&format!("Undo {}", self.format(Verbosity::Summary)));
        let done = self.run(ctx, Direction::Backward);
        if done {
            ctx.notify(&*self);
        }
        done
    }
    fn is_undoable(&self) -> bool {
        self.commands.iter().any(FileCommand::is_undoable)
    }
    fn is_zombie(&self) -> bool {
        self.commands.is_empty()
    }
    fn format(&self, verbosity: Verbosity) -> String {
        match verbosity {
            Verbosity::Brief => self.header(),
            Verbosity::Summary => {
                let main = self
                    .main_command()
                    .map(|cmd| cmd.format(Verbosity::Summary))
                    .unwrap_or_else(|| format!("{} (nothing)", self.kind.verb()));
                let more = match self.commands.len() {
                    0 | 1 => String::new(),
                    n => format!(" and {} more", n - 1),
                };
                format!("{}  {}{}", format_timestamp(& self.timestamp), main, more)
            }
            Verbosity::Detailed => {
                let mut lines = vec![self.header()];
                lines.extend(self.commands.iter().map(|cmd| cmd.format(Verbosity::Detailed)));
                lines.join("\n")
            }
        }
    }
}
