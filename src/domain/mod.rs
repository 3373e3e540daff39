//! Domain layer: core entities and business rules.

pub mod conversation;
pub mod events;
pub mod group;
pub mod identity;
pub mod message;
pub mod resource;

/// Returns the domain module name for smoke checks.
pub fn module_name() -> &'static str {
    "domain"
}
