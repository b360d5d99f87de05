//! Taskboard: kanban task lifecycle and board synchronisation engine.
//!
//! This crate provides the state model, transition rules, and
//! synchronisation algorithm behind a kanban workforce-management
//! application: task status and archival lifecycle, deterministic task
//! scoring, multi-view projection, and drag-and-drop reconciliation with
//! optimistic local mutation and authoritative server confirmation.
//!
//! # Architecture
//!
//! Taskboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (stores, APIs, etc.)
//!
//! # Modules
//!
//! - [`board`]: Task lifecycle, view projection, and drag reconciliation
//! - [`reputation`]: Reputation scoring consuming the task coefficient

pub mod board;
pub mod reputation;
