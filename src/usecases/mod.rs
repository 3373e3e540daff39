//! Use case layer: application workflows and orchestration.

pub mod bootstrap;
pub mod context;
pub mod conversation;
pub mod directory;
pub mod library;
pub mod session;
pub mod upload;

/// Returns the usecases module name for smoke checks.
pub fn module_name() -> &'static str {
    "usecases"
}
