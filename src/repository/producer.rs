//! Lazy single-shot producer.

use futures_util::future::BoxFuture;
use futures_util::stream::{self, BoxStream};
use futures_util::{FutureExt, StreamExt};
use std::future::{Future, IntoFuture};

use crate::remote::FetchResult;

type Thunk<T> = Box<dyn FnOnce() -> BoxFuture<'static, FetchResult<T>> + Send>;

/// A deferred computation yielding exactly one result.
///
/// The wrapped closure is not called until the producer is consumed, either
/// by awaiting it or by polling [`Producer::into_stream`].
pub struct Producer<T> {
    thunk: Thunk<T>,
}

impl<T: Send + 'static> Producer<T> {
    /// Wrap a factory for the future that does the work.
    pub fn new<F, Fut>(factory: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = FetchResult<T>> + Send + 'static,
    {
        Self {
            thunk: Box::new(move || factory().boxed()),
        }
    }

    /// A producer that yields an already known result.
    pub fn ready(result: FetchResult<T>) -> Self {
        Self::new(move || async move { result })
    }

    /// View the producer as a stream of exactly one item.
    ///
    /// The work starts on the first poll. Failures are yielded as the single
    /// item, so the stream never emits after an error.
    pub fn into_stream(self) -> BoxStream<'static, FetchResult<T>> {
        stream::once(async move { (self.thunk)().await }).boxed()
    }
}

impl<T: Send + 'static> IntoFuture for Producer<T> {
    type Output = FetchResult<T>;
    type IntoFuture = BoxFuture<'static, FetchResult<T>>;

    fn into_future(self) -> Self::IntoFuture {
        let thunk = self.thunk;
        async move { thunk().await }.boxed()
    }
}

impl<T> std::fmt::Debug for Producer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Producer").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::FetchError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn counting_producer(calls: Arc<AtomicUsize>) -> Producer<u32> {
        Producer::new(move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(7)
        })
    }

    #[tokio::test]
    async fn test_nothing_runs_until_consumed() {
        let calls = Arc::new(AtomicUsize::new(0));
        let producer = counting_producer(calls.clone());
        let stream = counting_producer(calls.clone()).into_stream();
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert_eq!(producer.await.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        drop(stream);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stream_yields_one_item_then_ends() {
        let calls = Arc::new(AtomicUsize::new(0));
        let items: Vec<_> = counting_producer(calls.clone()).into_stream().collect().await;

        assert_eq!(items.len(), 1);
        assert_eq!(*items[0].as_ref().unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_is_the_only_item() {
        let producer: Producer<u32> = Producer::ready(Err(FetchError::Timeout(Duration::from_secs(1))));
        let items: Vec<_> = producer.into_stream().collect().await;

        assert_eq!(items.len(), 1);
        assert!(matches!(items[0], Err(FetchError::Timeout(_))));
    }
}
