//! Integration test support for mktscan-ws.

pub mod common;
