//! Entity to model mappers
//!
//! - `From<Model> for Entity`: database rows to domain objects
//! - `*Insert` structs: entity data prepared for binding

mod access;
mod poll;
mod post;
mod reply;

pub use poll::poll_from_rows;
pub use post::PostInsert;
