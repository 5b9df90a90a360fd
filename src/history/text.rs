use super::{LoadedHistory, REDO_SECTION, UNDO_SECTION};
use crate::{
    command::{parse_timestamp, Command, CommandType, MacroCommand, Verbosity},
    ops::FileCommand,
};
use log::debug;
pub const END_OF_BATCH: &str = "<END OF BATCH>";
/// Prefix of the leaf a batch describes itself by.
const MAIN_MARKER: &str = "* ";
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Undo,
    Redo,
    Unknown,
}
pub fn render_log(undo: &[&MacroCommand], redo: &[&MacroCommand]) -> String {
    let mut out = String::new();
    render_section(&mut out, UNDO_SECTION, undo);
    out.push('\n');
    render_section(&mut out, REDO_SECTION, redo);
    out
}
fn render_section(out: &mut String, tag: &str, commands: &[&MacroCommand]) {
    out.push_str(&format!("[{}]\n", tag));
    for batch in commands {
        out.push_str(&batch.format(Verbosity::Brief));
        out.push('\n');
        for (index, leaf) in batch.commands().iter().enumerate() {
            if batch.main_index() == Some(index) {
                out.push_str(MAIN_MARKER);
            }
            out.push_str(&render_leaf(batch.kind(), leaf));
            out.push('\n');
        }
        out.push_str(END_OF_BATCH);
        out.push('\n');
    }
}
/// Leaves of a foreign type carry a `(KEY) ` prefix so mixed batches survive a reload.
fn render_leaf(kind: CommandType, leaf: &FileCommand) -> String {
    let entry = leaf.format(Verbosity::Brief);
    if leaf.command_type() == kind {
        entry
    } else {
        format!("({}) {}", leaf.command_type().key(), entry)
    }
}
/// Line-oriented and forgiving: anything that does not parse is skipped.
pub fn parse_log(text: &str) -> LoadedHistory {
    let mut history = LoadedHistory::default();
    let mut section: Option<Section> = None;
    let mut open: Option<MacroCommand> = None;
    for (number, raw) in text.lines().enumerate() {
        let line = raw.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        if line == END_OF_BATCH {
            match (open.take(), section) {
                (Some(batch), Some(Section::Undo)) if !batch.is_zombie() => {
                    history.undo.push(batch)
                }
                (Some(batch), Some(Section::Redo)) if !batch.is_zombie() => {
                    history.redo.push(batch)
                }
                _ => debug!("line {}: dropping batch outside a known section", number + 1),
            }
            continue;
        }
        if let Some(tag) = section_tag(line) {
            if open.take().is_some() {
                debug!("line {}: section change inside a batch, batch discarded", number + 1);
            }
            section = Some(tag);
            continue;
        }
        if let Some(batch) = parse_header(line) {
            if open.is_some() {
                debug!("line {}: unterminated batch discarded", number + 1);
            }
            open = Some(batch);
            continue;
        }
        match open.as_mut() {
            Some(batch) => {
                let (is_main, entry) = match line.strip_prefix(MAIN_MARKER) {
                    Some(entry) => (true, entry),
                    None => (false, line),
                };
                match parse_leaf(batch.kind(), entry) {
                    Some(leaf) => {
                        batch.push(leaf);
                        if is_main {
                            batch.set_main(batch.len() - 1);
                        }
                    }
                    None => debug!("line {}: unreadable entry skipped", number + 1),
                }
            }
            None => debug!("line {}: stray text skipped", number + 1),
        }
    }
    if open.is_some() {
        debug!("log ended inside a batch, discarding it");
    }
    history
}
fn section_tag(line: &str) -> Option<Section> {
    let tag = line.trim().strip_prefix('[')?.strip_suffix(']')?;
    Some(
        match tag {
            UNDO_SECTION => Section::Undo,
            REDO_SECTION => Section::Redo,
            _ => Section::Unknown,
        },
    )
}
/// `<KEY DD-MM-YYYY HH:MM:SS>` with an optional trailing ` [n]`.
fn parse_header(line: &str) -> Option<MacroCommand> {
    let (inner, rest) = line.strip_prefix('<')?.split_once('>')?;
    let rest = rest.trim();
    if !rest.is_empty() && !(rest.starts_with('[') && rest.ends_with(']')) {
        return None;
    }
    let (key, stamp) = inner.split_once(' ')?;
    let kind = CommandType::from_key(key)?;
    let timestamp = parse_timestamp(stamp)?;
    Some(MacroCommand::with_timestamp(kind, timestamp))
}
fn parse_leaf(kind: CommandType, line: &str) -> Option<FileCommand> {
    if let Some(tagged) = line.strip_prefix('(') {
        if let Some((key, entry)) = tagged.split_once(") ") {
            if let Some(leaf_kind) = CommandType::from_key(key) {
                return FileCommand::parse_entry(leaf_kind, entry);
            }
        }
    }
    FileCommand::parse_entry(kind, line)
}
