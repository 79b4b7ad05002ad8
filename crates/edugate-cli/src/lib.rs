//! # Edugate CLI
//!
//! Plain-text reports over the built-in rule tables and the denial log.
//! The binary in `main.rs` parses arguments and prints what these return.

pub mod report;
