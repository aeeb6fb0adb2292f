//! Shared library for `proved-effectifs`
//! Annual effectif tracking and growth-rate computation used by the CLI.

pub mod core;
pub mod logger;

pub use crate::core::*;
