//! The user store: latest user list plus the fetch trigger.

use futures_util::StreamExt;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::lifecycle::TaskScope;
use crate::model::UserList;
use crate::observability::metrics;
use crate::remote::FetchErrorKind;
use crate::repository::UserRepository;
use crate::store::observable::{Observable, ReadOnlyObservable, Subscription};

/// A fetch that ended in an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    /// Id of the fetch task, as logged in its span.
    pub fetch_id: Uuid,
    pub kind: FetchErrorKind,
    pub message: String,
}

/// Holds the last fetched user list and refreshes it on demand.
///
/// Value subscribers only ever see successful fetches. Failures leave the
/// value alone and are published on a separate failure observable.
pub struct UserStore {
    repository: UserRepository,
    users: Observable<UserList>,
    failures: Observable<Option<FetchFailure>>,
    scope: TaskScope,
}

impl UserStore {
    /// Create a store holding an empty list. `fetch` only starts work when
    /// called from inside a tokio runtime; elsewhere it logs and does nothing.
    pub fn new(repository: UserRepository) -> Self {
        Self {
            repository,
            users: Observable::new(UserList::empty()),
            failures: Observable::new(None),
            scope: TaskScope::new("user_store"),
        }
    }

    /// Start a refresh in the background.
    ///
    /// Fire and forget: the caller learns about the result only through
    /// subscriptions. Concurrent fetches all run; the last one to finish wins.
    pub fn fetch(&self) {
        let fetch_id = Uuid::new_v4();
        let span = tracing::info_span!("fetch_users", fetch_id = %fetch_id);
        let task = run_fetch(
            fetch_id,
            self.repository.clone(),
            self.users.clone(),
            self.failures.clone(),
        )
        .instrument(span);

        if self.scope.spawn(task).is_none() {
            tracing::warn!(fetch_id = %fetch_id, "Store is closed, fetch ignored");
        }
    }

    /// The current user list.
    pub fn value(&self) -> Arc<UserList> {
        self.users.get()
    }

    /// Read-only handle on the user list.
    pub fn users(&self) -> ReadOnlyObservable<UserList> {
        self.users.read_only()
    }

    /// Observe the user list. The callback gets the current list immediately.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Arc<UserList>) + Send + Sync + 'static,
    {
        let users = self.users.clone();
        let subscription = self
            .users
            .subscribe(callback)
            .on_detach(move || metrics::record_subscribers(users.subscriber_count()));
        metrics::record_subscribers(self.users.subscriber_count());
        subscription
    }

    /// The most recent failed fetch, if any.
    pub fn last_failure(&self) -> Option<FetchFailure> {
        (*self.failures.get()).clone()
    }

    /// Observe failed fetches. The callback gets the current failure (often `None`) immediately.
    pub fn subscribe_failures<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Arc<Option<FetchFailure>>) + Send + Sync + 'static,
    {
        self.failures.subscribe(callback)
    }

    /// Fetches still in flight.
    pub fn in_flight(&self) -> usize {
        self.scope.active_tasks()
    }

    /// Cancel in-flight fetches and refuse new ones. Cancelled fetches never write.
    pub fn close(&self) {
        self.scope.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.scope.is_cancelled()
    }
}

impl Drop for UserStore {
    fn drop(&mut self) {
        self.scope.cancel();
    }
}

impl std::fmt::Debug for UserStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserStore")
            .field("users", &self.users.get().len())
            .field("version", &self.users.version())
            .field("in_flight", &self.in_flight())
            .field("closed", &self.is_closed())
            .finish()
    }
}

async fn run_fetch(
    fetch_id: Uuid,
    repository: UserRepository,
    users: Observable<UserList>,
    failures: Observable<Option<FetchFailure>>,
) {
    let started = Instant::now();
    tracing::debug!("Fetch started");

    let mut results = repository.stream_users().into_stream();
    while let Some(result) = results.next().await {
        match result {
            Ok(list) => {
                let count = list.len();
                users.set(list);
                metrics::record_fetch("success", started);
                metrics::record_user_count(count);
                tracing::info!(count, "User list updated");
            }
            Err(e) => {
                let kind = e.kind();
                metrics::record_fetch(kind.as_str(), started);
                tracing::warn!(error = %e, kind = %kind, "Fetch failed, keeping previous user list");
                failures.set(Some(FetchFailure {
                    fetch_id,
                    kind,
                    message: e.to_string(),
                }));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::User;
    use crate::remote::{FetchError, FetchResult, UserSource};
    use futures_util::future::BoxFuture;
    use futures_util::FutureExt;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::mpsc;

    /// Answers every call with the same result after an optional delay.
    struct FixedSource {
        users: Option<UserList>,
        delay: Duration,
    }

    impl UserSource for FixedSource {
        fn fetch_users(&self) -> BoxFuture<'_, FetchResult<UserList>> {
            async move {
                tokio::time::sleep(self.delay).await;
                match &self.users {
                    Some(users) => Ok(users.clone()),
                    None => Err(FetchError::Status {
                        status: 502,
                        url: "http://test/users".to_string(),
                    }),
                }
            }
            .boxed()
        }
    }

    fn store_with(users: Option<UserList>, delay: Duration) -> UserStore {
        let source = Arc::new(FixedSource { users, delay });
        UserStore::new(UserRepository::new(source))
    }

    fn two_users() -> UserList {
        UserList::from(vec![User::new(1, "Ann"), User::new(2, "Bo")])
    }

    #[tokio::test]
    async fn test_initial_value_is_empty() {
        let store = store_with(Some(two_users()), Duration::ZERO);
        assert!(store.value().is_empty());
        assert!(Arc::ptr_eq(&store.value(), &store.value()));
        assert!(store.last_failure().is_none());
    }

    #[tokio::test]
    async fn test_fetch_updates_value_and_notifies_once() {
        let store = store_with(Some(two_users()), Duration::from_millis(5));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _sub = store.subscribe(move |list| {
            let _ = tx.send(Arc::clone(list));
        });

        assert!(rx.recv().await.unwrap().is_empty());

        store.fetch();
        let notified = rx.recv().await.unwrap();
        assert_eq!(*notified, two_users());
        assert!(Arc::ptr_eq(&notified, &store.value()));

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_failure_is_swallowed_for_value_subscribers() {
        let store = store_with(None, Duration::ZERO);
        let notifications = Arc::new(Mutex::new(0usize));
        let counter = notifications.clone();
        let _sub = store.subscribe(move |_| *counter.lock().unwrap() += 1);

        let (tx, mut rx) = mpsc::unbounded_channel();
        let _failures = store.subscribe_failures(move |failure| {
            if let Some(failure) = failure.as_ref() {
                let _ = tx.send(failure.clone());
            }
        });

        let before = store.value();
        store.fetch();
        let failure = rx.recv().await.unwrap();

        assert_eq!(failure.kind, FetchErrorKind::Transport);
        assert!(failure.message.contains("502"));
        assert!(Arc::ptr_eq(&before, &store.value()));
        assert_eq!(*notifications.lock().unwrap(), 1);
        assert_eq!(store.last_failure(), Some(failure));
    }

    #[test]
    fn test_fetch_outside_runtime_does_nothing() {
        let store = store_with(Some(two_users()), Duration::ZERO);
        store.fetch();
        assert_eq!(store.in_flight(), 0);
        assert!(store.value().is_empty());
        assert!(!store.is_closed());
    }

    #[tokio::test]
    async fn test_subscriber_count_drops_with_subscription() {
        let store = store_with(Some(two_users()), Duration::ZERO);
        let first = store.subscribe(|_| {});
        let second = store.subscribe(|_| {});
        assert_eq!(store.users.subscriber_count(), 2);

        first.unsubscribe();
        drop(second);
        assert_eq!(store.users.subscriber_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_cancels_in_flight_fetch() {
        let store = store_with(Some(two_users()), Duration::from_secs(10));
        let notifications = Arc::new(Mutex::new(0usize));
        let counter = notifications.clone();
        let _sub = store.subscribe(move |_| *counter.lock().unwrap() += 1);

        store.fetch();
        tokio::task::yield_now().await;
        assert_eq!(store.in_flight(), 1);

        store.close();
        tokio::time::sleep(Duration::from_secs(30)).await;

        assert!(store.value().is_empty());
        assert_eq!(*notifications.lock().unwrap(), 1);
        assert_eq!(store.in_flight(), 0);

        store.fetch();
        assert_eq!(store.in_flight(), 0);
    }
}
