//! Observable store subsystem.
//!
//! # Data Flow
//! ```text
//! UserStore::fetch()
//!     → TaskScope::spawn(fetch task)
//!     → UserRepository::stream_users() → Producer
//!     → Ok(list):  Observable::set → subscribers notified in order
//!     → Err(e):    value untouched, failure published separately
//! ```
//!
//! # Design Decisions
//! - One value slot, read lock-free, written under a single writer lock
//! - Write happens before notification, both under the writer lock
//! - Last write wins across concurrent fetches; nothing is cancelled by a newer fetch
//! - Failures never reach value subscribers

pub mod observable;
pub mod user_store;

pub use observable::{Observable, ReadOnlyObservable, Subscription};
pub use user_store::{FetchFailure, UserStore};
