//! Test fixtures providing reusable in-memory test data.

pub mod status;
