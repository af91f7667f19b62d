//! The remote source boundary.

use futures_util::future::BoxFuture;
use std::sync::Arc;

use crate::model::UserList;
use crate::remote::error::FetchResult;

/// Something that can fetch the complete user list.
///
/// Implementations may suspend on I/O. Each call is independent; failures of
/// any kind abort that call only.
pub trait UserSource: Send + Sync + 'static {
    /// Fetch every user, in service order.
    fn fetch_users(&self) -> BoxFuture<'_, FetchResult<UserList>>;
}

impl<S: UserSource + ?Sized> UserSource for Arc<S> {
    fn fetch_users(&self) -> BoxFuture<'_, FetchResult<UserList>> {
        (**self).fetch_users()
    }
}
