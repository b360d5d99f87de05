//! Unit tests for the board engine.

mod support;
