//! Fetch a user list, keep the latest copy, notify observers.

pub mod config;
pub mod lifecycle;
pub mod model;
pub mod observability;
pub mod remote;
pub mod repository;
pub mod screen;
pub mod store;

pub use config::FeedConfig;
pub use model::{User, UserList};
pub use remote::{FetchError, FetchErrorKind, HttpUserSource, UserSource};
pub use repository::{Producer, UserRepository};
pub use screen::{CountView, UserScreen};
pub use store::{Observable, Subscription, UserStore};
