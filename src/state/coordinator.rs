use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Opaque per-widget token, allocated by an [`OpenCoordinator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(u64);

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "picker#{}", self.0)
    }
}

/// Broadcast to every other registered widget when `id` opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenNotice {
    pub id: WidgetId,
}

pub struct Registration {
    pub id: WidgetId,
    pub notices: Receiver<OpenNotice>,
}

#[derive(Debug, Default)]
struct Registry {
    open: Option<WidgetId>,
    next_id: u64,
    subscribers: Vec<(WidgetId, Sender<OpenNotice>)>,
}

/// Single-open arbiter for a group of pickers.
///
/// Holds at most one open [`WidgetId`]. Opening is last-writer-wins: the most
/// recent `request_open` owns the slot and every other member of the group
/// is told to close. Clones are handles to the same registry; separate
/// `OpenCoordinator::new()` calls give independent groups.
#[derive(Debug, Clone, Default)]
pub struct OpenCoordinator {
    registry: Arc<Mutex<Registry>>,
}

impl OpenCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn register(&self) -> Registration {
        let mut registry = self.lock();
        let id = WidgetId(registry.next_id);
        registry.next_id += 1;
        let (tx, rx) = mpsc::channel();
        registry.subscribers.push((id, tx));
        log::debug!("registered {id}");
        Registration { id, notices: rx }
    }

    pub fn unregister(&self, id: WidgetId) {
        let mut registry = self.lock();
        registry.subscribers.retain(|(sub, _)| *sub != id);
        if registry.open == Some(id) {
            registry.open = None;
        }
        log::debug!("unregistered {id}");
    }

    pub fn request_open(&self, id: WidgetId) {
        let mut registry = self.lock();
        let previous = registry.open.replace(id);
        // Drop subscribers whose widget is gone.
        registry
            .subscribers
            .retain(|(sub, tx)| *sub == id || tx.send(OpenNotice { id }).is_ok());
        log::debug!("{id} opened (previously open: {previous:?})");
    }

    /// Clears the slot if `id` holds it. Returns whether it did.
    pub fn notify_closed(&self, id: WidgetId) -> bool {
        let mut registry = self.lock();
        if registry.open == Some(id) {
            registry.open = None;
            log::debug!("{id} closed");
            true
        } else {
            false
        }
    }

    pub fn current(&self) -> Option<WidgetId> {
        self.lock().open
    }

    pub fn is_open(&self, id: WidgetId) -> bool {
        self.current() == Some(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }
}
