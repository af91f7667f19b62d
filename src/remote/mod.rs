//! Remote user source subsystem.
//!
//! # Data Flow
//! ```text
//! UserSource::fetch_users()
//!     → GET {base_url}users        (http.rs)
//!     → status check               (non-2xx → Transport)
//!     → body text → serde_json     (bad body → Decode)
//!     → UserList
//! ```
//!
//! # Design Decisions
//! - One request per call, no retry, no state kept between calls
//! - The trait is object safe so stores can hold `Arc<dyn UserSource>`
//! - Body is read as text first so decode failures never look like transport failures

pub mod error;
pub mod http;
pub mod source;

pub use error::{FetchError, FetchErrorKind, FetchResult};
pub use http::HttpUserSource;
pub use source::UserSource;
