//! Subcommands of the `qnim` binary

pub mod train;
