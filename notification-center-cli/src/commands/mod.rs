//! CLI subcommands.

pub mod center;
pub mod notification;
