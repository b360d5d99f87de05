//! Port contracts for the board engine.

pub mod store;

pub use store::{
    StageNoteAppend, TaskFilter, TaskPatch, TaskStore, TaskStoreError, TaskStoreResult,
};
