//! Physics module for collision queries and response
//!
//! Narrow-phase only: the category indices of the registry already keep the
//! candidate lists short, so every query is a linear scan of one category.

pub mod collision;

pub use collision::{overlapping, resolve_against, Contacts};
