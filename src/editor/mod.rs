//! Interactive reordering of a core.
//!
//! Wraps the category moves with a record of what was done so an editing
//! session can step backwards and forwards:
//!
//! - **Commands**: [`MoveCommand`] names one move as `category:from:to`
//! - **Undo/Redo**: [`MoveHistory`] keeps a bounded undo stack and a redo stack

pub mod history;

pub use history::{MoveCommand, MoveHistory};
