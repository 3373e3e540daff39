//! Infrastructure layer: adapters for config, storage, and OS integrations.

pub mod config;
pub mod contracts;
pub mod error;
pub mod logging;
pub mod secrets;
pub mod storage_layout;
pub mod token_store;

/// Returns the infra module name for smoke checks.
pub fn module_name() -> &'static str {
    "infra"
}
