//! Trigger and subscriber wiring.
//!
//! # Data Flow
//! ```text
//! activate()
//!     → store.fetch()                 (once per activation)
//!     → store.subscribe(view)         (initial list, then every update)
//!     → CountView::show_count(n)
//!
//! deactivate() / drop
//!     → subscription dropped          (view no longer notified)
//! ```
//!
//! # Design Decisions
//! - The screen owns its subscription; the store owns the fetch task
//! - Deactivating does not cancel a fetch already running in the store

pub mod user_screen;
pub mod view;

pub use user_screen::UserScreen;
pub use view::{CountView, LogCountView};
