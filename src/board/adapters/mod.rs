//! Adapter implementations of the board engine ports.

pub mod memory;
