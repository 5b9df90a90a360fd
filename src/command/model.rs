use super::{
    context::ExecContext, macro_cmd::MacroCommand, types::{Command, Verbosity},
};
use log::{debug, warn};
use std::collections::VecDeque;
/// Linear undo/redo history; the back of each deque is its top.
pub struct CommandModel<C: Command = MacroCommand> {
    undo_stack: VecDeque<C>,
    redo_stack: VecDeque<C>,
}
impl<C: Command> CommandModel<C> {
    pub fn new() -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
        }
    }
    pub fn execute(&mut self, mut command: C, ctx: &mut ExecContext<'_>) -> bool {
        let done = command.execute(ctx);
        if done {
            self.push(command);
        } else {
            debug!("{} had no effect", command.format(Verbosity::Brief));
        }
        done
    }
    /// Records a command whose side effects already happened.
    pub fn push(&mut self, command: C) -> bool {
        if command.is_zombie() {
            debug!("discarding empty command {}", command.format(Verbosity::Brief));
            return false;
        }
        self.undo_stack.push_back(command);
        self.redo_stack.clear();
        true
    }
    /// Returns the number of steps actually undone.
    pub fn undo(&mut self, steps: usize, ctx: &mut ExecContext<'_>) -> usize {
        let mut done = 0;
        while done < steps {
            let Some(mut command) = self.undo_stack.pop_back() else {
                break;
            };
            if command.unexecute(ctx) && !command.is_zombie() {
                self.redo_stack.push_back(command);
                done += 1;
            } else {
                warn!("undo failed, dropping {}", command.format(Verbosity::Summary));
                break;
            }
        }
        done
    }
    /// Returns the number of steps actually redone.
    pub fn redo(&mut self, steps: usize, ctx: &mut ExecContext<'_>) -> usize {
        let mut done = 0;
        while done < steps {
            let Some(mut command) = self.redo_stack.pop_back() else {
                break;
            };
            if command.execute(ctx) && !command.is_zombie() {
                self.undo_stack.push_back(command);
                done += 1;
            } else {
                warn!("redo failed, dropping {}", command.format(Verbosity::Summary));
                break;
            }
        }
        done
    }
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
    pub fn peek_undo(&self) -> Option<&C> {
        self.undo_stack.back()
    }
    pub fn peek_redo(&self) -> Option<&C> {
        self.redo_stack.back()
    }
    /// Bottom to top.
    pub fn undo_stack(&self) -> impl Iterator<Item = &C> {
        self.undo_stack.iter()
    }
    /// Bottom to top.
    pub fn redo_stack(&self) -> impl Iterator<Item = &C> {
        self.redo_stack.iter()
    }
    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }
    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }
    pub fn len(&self) -> usize {
        self.undo_stack.len() + self.redo_stack.len()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Keeps at most `max_size` commands across both stacks, evicting the
    /// oldest undo entries first. Returns how many were evicted.
    pub fn remove_expired_commands(&mut self, max_size: usize) -> usize {
        let mut removed = 0;
        while self.len() > max_size {
            if self.undo_stack.pop_front().is_none() {
                self.redo_stack.pop_front();
            }
            removed += 1;
        }
        if removed > 0 {
            debug!("evicted {} expired command(s)", removed);
        }
        removed
    }
    /// Replaces both stacks, skipping empty commands.
    pub fn replace_stacks(&mut self, undo: Vec<C>, redo: Vec<C>) {
        self.undo_stack = undo.into_iter().filter(|c| !c.is_zombie()).collect();
        self.redo_stack = redo.into_iter().filter(|c| !c.is_zombie()).collect();
    }
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
impl<C: Command> Default for CommandModel<C> {
    fn default() -> Self {
        Self::new()
    }
}
