//! High-level operations that correspond to CLI commands
//!
//! These modules contain the core logic for each syncstage operation,
//! separated from CLI concerns like argument parsing and output formatting.

pub mod rename;
pub mod replay;

pub use rename::{rename_operation, RenameSession};
pub use replay::replay_operation;
