//! Descriptions - free text attached to characters and relationships.
//!
//! - **Draft**: The submitted form, checked for exactly one owner link
//! - **Resolver**: Picks the primary description of an owner and fixes up
//!   `sort_order` / `is_primary` right after an insert

mod draft;
mod resolver;

pub use draft::*;
pub use resolver::*;
