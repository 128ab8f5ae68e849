//! Request extractors.

pub mod entity;
pub use entity::EntityKind;
