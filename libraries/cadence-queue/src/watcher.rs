//! Queue change notifications
//!
//! Observers implement `QueueCallback`, overriding only the notifications
//! they care about. `QueueWatcher` fans each notification out to every
//! registered observer, in registration order.
//!
//! Delivery is synchronous, on the caller's thread, right after the mutation
//! that caused it. When one operation produces both, queue-changed is
//! delivered before position-changed.

use crate::types::{QueueChangeReason, RepeatMode, ShuffleMode};
use crate::view::QueueView;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::error;

/// Receives queue notifications
///
/// All methods default to no-ops.
pub trait QueueCallback: Send + Sync {
    /// Items were replaced, added, removed, reordered or reshuffled
    fn on_queue_changed(&self, _queue: &QueueView<'_>, _reason: QueueChangeReason) {}

    /// The current item's position in the active ordering changed
    ///
    /// Either side is `None` when there was (or is) no locatable current item.
    fn on_queue_position_changed(
        &self,
        _old_position: Option<usize>,
        _new_position: Option<usize>,
    ) {
    }

    fn on_shuffle_changed(&self, _shuffle_mode: ShuffleMode) {}

    fn on_repeat_changed(&self, _repeat_mode: RepeatMode) {}

    /// The initial queue restore completed. Delivered once.
    fn on_queue_restored(&self) {}
}

/// Registered queue observers
#[derive(Default, Clone)]
pub struct QueueWatcher {
    callbacks: Vec<Arc<dyn QueueCallback>>,
}

impl fmt::Debug for QueueWatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueWatcher")
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

fn same_callback<A: ?Sized, B: ?Sized>(a: &Arc<A>, b: &Arc<B>) -> bool {
    Arc::as_ptr(a).cast::<()>() == Arc::as_ptr(b).cast::<()>()
}

impl QueueWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer
    ///
    /// Returns false if it was already registered.
    pub fn add_callback(&mut self, callback: Arc<dyn QueueCallback>) -> bool {
        if self.callbacks.iter().any(|existing| same_callback(existing, &callback)) {
            return false;
        }
        self.callbacks.push(callback);
        true
    }

    /// Unregister an observer, matched by identity
    ///
    /// Returns false if it was not registered.
    pub fn remove_callback<C: QueueCallback + ?Sized>(&mut self, callback: &Arc<C>) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|existing| !same_callback(existing, callback));
        self.callbacks.len() != before
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    pub fn on_queue_changed(&self, queue: &QueueView<'_>, reason: QueueChangeReason) {
        self.dispatch("queue_changed", |callback| {
            callback.on_queue_changed(queue, reason);
        });
    }

    pub fn on_queue_position_changed(
        &self,
        old_position: Option<usize>,
        new_position: Option<usize>,
    ) {
        self.dispatch("queue_position_changed", |callback| {
            callback.on_queue_position_changed(old_position, new_position);
        });
    }

    pub fn on_shuffle_changed(&self, shuffle_mode: ShuffleMode) {
        self.dispatch("shuffle_changed", |callback| {
            callback.on_shuffle_changed(shuffle_mode);
        });
    }

    pub fn on_repeat_changed(&self, repeat_mode: RepeatMode) {
        self.dispatch("repeat_changed", |callback| {
            callback.on_repeat_changed(repeat_mode);
        });
    }

    pub fn on_queue_restored(&self) {
        self.dispatch("queue_restored", |callback| callback.on_queue_restored());
    }

    /// Deliver to every observer; a panicking observer doesn't stop the rest
    fn dispatch(&self, event: &str, notify: impl Fn(&dyn QueueCallback)) {
        for (index, callback) in self.callbacks.iter().enumerate() {
            let result = panic::catch_unwind(AssertUnwindSafe(|| notify(callback.as_ref())));
            if result.is_err() {
                error!(event, observer = index, "Queue observer panicked; continuing delivery");
            }
        }
    }
}
