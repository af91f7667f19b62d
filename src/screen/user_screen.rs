//! The initiation point that drives a [`UserStore`].

use std::sync::Arc;

use crate::screen::view::CountView;
use crate::store::{Subscription, UserStore};

/// A screen showing the number of users.
///
/// While active it holds one subscription to the store. Dropping the screen
/// deactivates it.
pub struct UserScreen {
    store: Arc<UserStore>,
    view: Arc<dyn CountView>,
    subscription: Option<Subscription>,
}

impl UserScreen {
    pub fn new(store: Arc<UserStore>, view: Arc<dyn CountView>) -> Self {
        Self {
            store,
            view,
            subscription: None,
        }
    }

    /// Trigger one fetch and start showing counts. No-op if already active.
    pub fn activate(&mut self) {
        if self.subscription.is_some() {
            tracing::debug!("Screen already active");
            return;
        }

        tracing::debug!("Screen activated");
        self.store.fetch();

        let view = Arc::clone(&self.view);
        self.subscription = Some(self.store.subscribe(move |users| view.show_count(users.len())));
    }

    /// Stop showing counts.
    pub fn deactivate(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
            tracing::debug!("Screen deactivated");
        }
    }

    pub fn is_active(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn store(&self) -> &Arc<UserStore> {
        &self.store
    }
}

impl Drop for UserScreen {
    fn drop(&mut self) {
        self.deactivate();
    }
}
