//! Command-line interface for the `hufflz` binary.
//!
//! Argument definitions live in [`args`]; dispatch is in `main.rs`.

pub mod args;

pub use args::{words_from_le_bytes, Cli, Command, TableArgs, VerifyArgs};
