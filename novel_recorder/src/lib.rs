//! # Novel Recorder Core
//!
//! Access control and description bookkeeping on top of `novel_model`.
//!
//! ## Core Components
//!
//! - **access**: Decides whether an actor may read or write a novel entity
//! - **descriptions**: Picks the primary description of a character or
//!   relationship and keeps the cached `is_primary` flag consistent
//! - **recorder**: The service every request goes through; checks access
//!   before touching the store
//!
//! ## Design Philosophy
//!
//! - **One check per request**: Every operation asks the evaluator once for the
//!   entity it touches, then works against the store
//! - **Explicit fix-ups**: Work that must follow an insert is called by the
//!   creating operation inside the same transaction, never by a listener

pub mod access;
pub mod descriptions;
pub mod error;
pub mod recorder;
pub mod validation;

pub use access::*;
pub use descriptions::*;
pub use error::*;
pub use recorder::*;
