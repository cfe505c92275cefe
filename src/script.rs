//! Move scripts: an ordered list of moves stored as JSON.
//!
//! ```json
//! { "moves": [ { "category": "storage", "from": 0, "to": 2 },
//!              { "category": "w", "from": 1, "to": 0 } ] }
//! ```

use crate::editor::{MoveCommand, MoveHistory};
use crate::model::Core;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveScript {
    #[serde(default)]
    pub moves: Vec<MoveCommand>,
}

impl MoveScript {
    pub fn new(moves: Vec<MoveCommand>) -> Self {
        Self { moves }
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Failed to parse move script")
    }

    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("In {}", path.display()))
    }

    /// Append moves (e.g. from the command line) after the scripted ones.
    pub fn extend(&mut self, moves: impl IntoIterator<Item = MoveCommand>) {
        self.moves.extend(moves);
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Apply every move in order, recording them in a fresh history.
    ///
    /// Stops at the first failing move; the moves before it stay applied and
    /// are returned in the error context by step number.
    pub fn run<S: Clone, E: Clone>(&self, core: &mut Core<S, E>) -> Result<MoveHistory> {
        let mut history = MoveHistory::new(self.moves.len());
        for (step, cmd) in self.moves.iter().enumerate() {
            history
                .apply(core, *cmd)
                .with_context(|| format!("Move {} ({}) failed", step + 1, cmd))?;
            debug!(step = step + 1, %cmd, "script move applied");
        }
        Ok(history)
    }
}
