//! CLI command handlers for `proved-effectifs`.
//!
//! Each command is implemented in its own submodule.

pub mod config;
pub mod effectifs;
