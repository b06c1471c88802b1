//! Single-writer observable state.
//!
//! `Observable<T>` is held privately by the service that owns the value and
//! is the only way to change it. Readers get a `StateHandle<T>`, which can
//! read the current value and wait for changes but has no write access.

use tokio::sync::watch;

pub(crate) struct Observable<T> {
    tx: watch::Sender<T>,
}

impl<T> Observable<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Replace the value and notify subscribers.
    pub(crate) fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    pub fn handle(&self) -> StateHandle<T> {
        StateHandle {
            rx: self.tx.subscribe(),
        }
    }
}

impl<T: Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Read-only view of an `Observable<T>`.
#[derive(Clone)]
pub struct StateHandle<T> {
    rx: watch::Receiver<T>,
}

impl<T> StateHandle<T> {
    /// Borrow the current value. Holding the guard blocks the writer,
    /// so keep it short.
    pub fn borrow(&self) -> watch::Ref<'_, T> {
        self.rx.borrow()
    }

    /// Independent receiver for UI layers that want to drive their own
    /// reactivity from `changed()`.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.rx.clone()
    }

    /// Wait until the value changes after the last one this handle saw.
    /// Returns `false` once the owning service has been dropped.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

impl<T: Clone> StateHandle<T> {
    pub fn get(&self) -> T {
        self.rx.borrow().clone()
    }
}
