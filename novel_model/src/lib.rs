//! # Novel Model
//!
//! The record schema crate - entity definitions, permission levels and the
//! relational store that holds them. This crate is the single source of truth
//! for stored state and contains no access-control logic.

pub mod entities;
pub mod permissions;
pub mod store;

pub use entities::*;
pub use permissions::*;
pub use store::*;
