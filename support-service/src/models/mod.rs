//! Domain models for the support service.

pub mod chat;
pub mod resource;

pub use chat::{ChatTurn, Location, Role, Severity};
pub use resource::{EmergencyContact, Resource, ResourceGroup, ResourceKind};
