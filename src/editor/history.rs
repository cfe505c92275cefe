//! Recorded moves and the undo/redo stack built on them.
//!
//! # Design
//!
//! A [`MoveCommand`] is just the category and the two relative indices; its
//! inverse swaps the indices. [`MoveHistory`] stores the forward commands and
//! replays inverses on undo.

use crate::error::{Result, StructureError};
use crate::model::{Category, Core};
use crate::structure::move_in;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ────────────────────────────────────────────────────────────────────────────
// MoveCommand
// ────────────────────────────────────────────────────────────────────────────

/// A single move of one variable within its category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCommand {
    pub category: Category,
    pub from: usize,
    pub to: usize,
}

impl MoveCommand {
    pub fn new(category: Category, from: usize, to: usize) -> Self {
        Self { category, from, to }
    }

    pub fn apply<S: Clone, E: Clone>(&self, core: &mut Core<S, E>) -> Result<()> {
        move_in(core, self.category, self.from, self.to)
    }

    /// The move that restores the order this one changes.
    pub fn inverse(&self) -> Self {
        Self {
            category: self.category,
            from: self.to,
            to: self.from,
        }
    }
}

impl fmt::Display for MoveCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.category, self.from, self.to)
    }
}

impl FromStr for MoveCommand {
    type Err = StructureError;

    /// Parse `"<category>:<from>:<to>"`, e.g. `"storage:0:2"` or `"w:1:0"`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || StructureError::InvalidMove(s.to_string());
        let (category, rest) = s.split_once(':').ok_or_else(invalid)?;
        let (from, to) = rest.split_once(':').ok_or_else(invalid)?;
        let category: Category = category.parse()?;
        let from = from.trim().parse().map_err(|_| invalid())?;
        let to = to.trim().parse().map_err(|_| invalid())?;
        Ok(Self { category, from, to })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// MoveHistory (undo / redo stack)
// ────────────────────────────────────────────────────────────────────────────

/// Undo/redo history for moves applied to one core.
///
/// # Example
///
/// ```rust
/// use phscore::editor::{MoveCommand, MoveHistory};
/// use phscore::model::{Category, Core, StructureMatrix};
///
/// let mut core: Core<&str, f64> = Core::new("lc");
/// core.x = vec!["q", "phi"];
/// core.m = StructureMatrix::zeros(2);
///
/// let mut history = MoveHistory::new(16);
/// history.apply(&mut core, MoveCommand::new(Category::Storage, 0, 1)).unwrap();
/// assert_eq!(core.x, vec!["phi", "q"]);
/// history.undo(&mut core).unwrap();
/// assert_eq!(core.x, vec!["q", "phi"]);
/// ```
#[derive(Debug, Clone)]
pub struct MoveHistory {
    undo_stack: Vec<MoveCommand>,
    redo_stack: Vec<MoveCommand>,
    max_size: usize,
}

impl MoveHistory {
    /// Create a new history with the given maximum undo depth.
    pub fn new(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size,
        }
    }

    /// Apply `cmd` to `core` and record it. Nothing is recorded if the move fails.
    pub fn apply<S: Clone, E: Clone>(&mut self, core: &mut Core<S, E>, cmd: MoveCommand) -> Result<()> {
        cmd.apply(core)?;
        self.push(cmd);
        Ok(())
    }

    /// Push an already-applied command onto the undo stack and clear the redo stack.
    pub fn push(&mut self, cmd: MoveCommand) {
        self.undo_stack.push(cmd);
        self.redo_stack.clear();
        if self.undo_stack.len() > self.max_size {
            self.undo_stack.remove(0);
        }
    }

    /// Undo the last command, returning `Ok(true)` if an undo was performed.
    pub fn undo<S: Clone, E: Clone>(&mut self, core: &mut Core<S, E>) -> Result<bool> {
        let Some(cmd) = self.undo_stack.pop() else {
            return Ok(false);
        };
        if let Err(err) = cmd.inverse().apply(core) {
            self.undo_stack.push(cmd);
            return Err(err);
        }
        self.redo_stack.push(cmd);
        Ok(true)
    }

    /// Redo the last undone command, returning `Ok(true)` if a redo was performed.
    pub fn redo<S: Clone, E: Clone>(&mut self, core: &mut Core<S, E>) -> Result<bool> {
        let Some(cmd) = self.redo_stack.pop() else {
            return Ok(false);
        };
        if let Err(err) = cmd.apply(core) {
            self.redo_stack.push(cmd);
            return Err(err);
        }
        self.undo_stack.push(cmd);
        Ok(true)
    }

    /// Returns true if there are commands to undo.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there are commands to redo.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Commands that can currently be undone, oldest first.
    pub fn applied(&self) -> &[MoveCommand] {
        &self.undo_stack
    }

    /// Clear all history.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
