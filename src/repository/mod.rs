//! Repository subsystem.
//!
//! # Data Flow
//! ```text
//! UserRepository::stream_users()
//!     → Producer<UserList>       (nothing happens yet)
//!     → consumer awaits / polls  (source called exactly once)
//!     → one FetchResult<UserList>, then completion
//! ```
//!
//! # Design Decisions
//! - Producers are cold: the network call starts when consumption starts
//! - Producers are consumed by value, so each one runs at most once
//! - A fresh producer means a fresh network call; nothing is cached here

pub mod producer;
pub mod user_repository;

pub use producer::Producer;
pub use user_repository::UserRepository;
