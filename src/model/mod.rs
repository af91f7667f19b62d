//! Data model for the user feed.
//!
//! # Data Flow
//! ```text
//! JSON array (wire)
//!     → serde_json (decode)
//!     → UserList (ordered, immutable)
//!     → shared via Arc<UserList> by the store
//! ```
//!
//! # Design Decisions
//! - Lists keep the wire order; no dedup, no sort
//! - Unknown wire fields are kept, never rejected

pub mod user;

pub use user::{User, UserList};
