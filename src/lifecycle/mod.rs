//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Owner created (store, screen):
//!     → TaskScope::new
//!     → scope.spawn(task)  (task races the scope's cancel signal)
//!
//! Owner torn down:
//!     → scope.cancel() or last handle dropped
//!     → every task in the scope stops at its next await point
//!
//! Signals (signals.rs):
//!     SIGINT → binary deactivates the screen and exits
//! ```
//!
//! # Design Decisions
//! - Scopes are explicit values, never ambient
//! - Cancellation only happens at await points, never mid-write
//! - A cancelled scope refuses new tasks

pub mod scope;
pub mod signals;

pub use scope::TaskScope;
