//! Task lifecycle and board synchronisation for Taskboard.
//!
//! This module maintains task status and archival state across multiple
//! simultaneous views (a single board, the "my tasks" board, and the
//! "my tasks" archive), reconciles drag-and-drop gestures with optimistic
//! local mutation and authoritative store confirmation, and derives the
//! deterministic coefficient consumed by compensation and reputation
//! subsystems. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
