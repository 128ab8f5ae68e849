//! HTTP handlers for entity CRUD and the API description.

pub mod entity;
pub mod openapi;
pub use entity::*;
