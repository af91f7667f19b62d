//! Presentation of the user count.

/// Something that can show how many users were loaded.
pub trait CountView: Send + Sync + 'static {
    fn show_count(&self, count: usize);
}

impl<F> CountView for F
where
    F: Fn(usize) + Send + Sync + 'static,
{
    fn show_count(&self, count: usize) {
        self(count)
    }
}

/// Reports the count as a log event.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogCountView;

impl CountView for LogCountView {
    fn show_count(&self, count: usize) {
        tracing::info!(count, "Users: {}", count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_closure_view_receives_count() {
        let last = Arc::new(AtomicUsize::new(0));
        let sink = last.clone();
        let view: Arc<dyn CountView> = Arc::new(move |count: usize| sink.store(count, Ordering::SeqCst));

        view.show_count(3);
        assert_eq!(last.load(Ordering::SeqCst), 3);

        LogCountView.show_count(3);
    }
}
