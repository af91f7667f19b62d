//! User repository: wraps the remote source in producers.

use std::sync::Arc;

use crate::model::UserList;
use crate::remote::UserSource;
use crate::repository::producer::Producer;

/// Hands out one cold producer per request for the user list.
#[derive(Clone)]
pub struct UserRepository {
    source: Arc<dyn UserSource>,
}

impl UserRepository {
    pub fn new(source: Arc<dyn UserSource>) -> Self {
        Self { source }
    }

    /// Build a producer that calls the source once when consumed.
    ///
    /// Errors from the source come through unchanged; there is no retry.
    pub fn stream_users(&self) -> Producer<UserList> {
        let source = Arc::clone(&self.source);
        Producer::new(move || async move { source.fetch_users().await })
    }
}

impl std::fmt::Debug for UserRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRepository").finish_non_exhaustive()
    }
}
