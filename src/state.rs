//! Shared application state.

use std::sync::Arc;

use crate::notify::Notifier;
use crate::store::EventStore;

/// State handed to every request handler. Cloning is cheap; both seams
/// sit behind one shared `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<dyn EventStore>,
    notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub fn new(store: Arc<dyn EventStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { store, notifier }),
        }
    }

    pub fn store(&self) -> &dyn EventStore {
        self.inner.store.as_ref()
    }

    pub fn notifier(&self) -> Arc<dyn Notifier> {
        Arc::clone(&self.inner.notifier)
    }
}
