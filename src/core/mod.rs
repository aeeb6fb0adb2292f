//! Core module: effectif models, storage, growth rates and configuration

pub mod config;
pub mod defaults;
pub mod error;
pub mod growth_rate;
pub mod models;
pub mod resolver;
pub mod service;
pub mod store;

pub use error::{EffectifError, StoreError};
pub use service::{EffectifService, GrowthComparison};

/// Returns the current version of the `proved-effectifs` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
