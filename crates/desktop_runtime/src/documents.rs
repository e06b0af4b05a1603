//! Session-wide document content store with default fallback and change subscriptions.
//!
//! The store is an explicitly constructed service. Clones of [`DocumentStore`] are handles to the
//! same state, so every view and the persistence layer observe one set of overrides. Notifications
//! are delivered synchronously: when [`DocumentStore::set_content`] returns, every subscriber has
//! already seen the change.

use std::{
    cell::RefCell,
    collections::{BTreeMap, HashMap},
    rc::{Rc, Weak},
};

/// Read-only mapping from document id to its built-in text.
pub trait DefaultContentProvider {
    /// Built-in text for `id`, or `None` for ids the provider does not know.
    fn default_content(&self, id: &str) -> Option<String>;
}

impl DefaultContentProvider for BTreeMap<String, String> {
    fn default_content(&self, id: &str) -> Option<String> {
        self.get(id).cloned()
    }
}

impl DefaultContentProvider for HashMap<String, String> {
    fn default_content(&self, id: &str) -> Option<String> {
        self.get(id).cloned()
    }
}

/// Builds a default map from `(id, text)` pairs.
pub fn defaults_from<I, K, V>(entries: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    entries
        .into_iter()
        .map(|(id, text)| (id.into(), text.into()))
        .collect()
}

/// What caused a [`DocumentChange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// An override was written by [`DocumentStore::set_content`].
    Edited,
    /// The override was cleared by [`DocumentStore::revert_content`].
    Reverted,
    /// A stored override was loaded at boot.
    Hydrated,
}

/// Payload handed to subscribers. Subscribers re-read their own id from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentChange {
    pub id: String,
    pub kind: ChangeKind,
}

/// Token returned by [`DocumentStore::subscribe`]; pass it to [`DocumentStore::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Subscription(u64);

/// Persistence work produced by mutations, drained by [`crate::persistence::flush_documents`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingWrite {
    Save { id: String, text: String },
    Delete { id: String },
}

impl PendingWrite {
    pub fn id(&self) -> &str {
        match self {
            Self::Save { id, .. } | Self::Delete { id } => id,
        }
    }
}

type Subscriber = Rc<dyn Fn(&DocumentChange)>;

struct StoreInner {
    defaults: Rc<dyn DefaultContentProvider>,
    overrides: BTreeMap<String, String>,
    subscribers: BTreeMap<Subscription, Subscriber>,
    next_subscription: u64,
    notify_depth: usize,
    max_notify_depth: usize,
    pending_writes: Vec<PendingWrite>,
}

impl StoreInner {
    /// Whether a write issued at the current notification depth must be refused.
    fn rejects_nested_write(&self, id: &str) -> bool {
        if self.notify_depth < self.max_notify_depth {
            return false;
        }
        leptos::logging::warn!(
            "document store: write to {id} rejected at notification depth {}",
            self.max_notify_depth
        );
        true
    }

    fn queue_write(&mut self, write: PendingWrite) {
        // Only the latest write per id matters to the persistence layer.
        self.pending_writes.retain(|queued| queued.id() != write.id());
        self.pending_writes.push(write);
    }
}

#[derive(Clone)]
pub struct DocumentStore {
    inner: Rc<RefCell<StoreInner>>,
}

/// Non-owning handle held by subscribers so callbacks do not keep the store alive.
#[derive(Clone)]
pub struct WeakDocumentStore {
    inner: Weak<RefCell<StoreInner>>,
}

impl WeakDocumentStore {
    pub fn upgrade(&self) -> Option<DocumentStore> {
        self.inner.upgrade().map(|inner| DocumentStore { inner })
    }
}

impl DocumentStore {
    pub const DEFAULT_MAX_NOTIFY_DEPTH: usize = 8;

    pub fn new(defaults: impl DefaultContentProvider + 'static) -> Self {
        Self::with_max_notify_depth(defaults, Self::DEFAULT_MAX_NOTIFY_DEPTH)
    }

    pub fn with_max_notify_depth(
        defaults: impl DefaultContentProvider + 'static,
        max_notify_depth: usize,
    ) -> Self {
        Self {
            inner: Rc::new(RefCell::new(StoreInner {
                defaults: Rc::new(defaults),
                overrides: BTreeMap::new(),
                subscribers: BTreeMap::new(),
                next_subscription: 1,
                notify_depth: 0,
                max_notify_depth: max_notify_depth.max(1),
                pending_writes: Vec::new(),
            })),
        }
    }

    pub fn downgrade(&self) -> WeakDocumentStore {
        WeakDocumentStore {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Override for `id`, else its built-in default, else an empty string.
    pub fn get_content(&self, id: &str) -> String {
        let inner = self.inner.borrow();
        if let Some(text) = inner.overrides.get(id) {
            return text.clone();
        }
        inner.defaults.default_content(id).unwrap_or_default()
    }

    pub fn default_content(&self, id: &str) -> String {
        self.inner
            .borrow()
            .defaults
            .default_content(id)
            .unwrap_or_default()
    }

    /// Whether `id` has been edited away from (or explicitly back onto) its default.
    pub fn has_override(&self, id: &str) -> bool {
        self.inner.borrow().overrides.contains_key(id)
    }

    pub fn overridden_ids(&self) -> Vec<String> {
        self.inner.borrow().overrides.keys().cloned().collect()
    }

    /// Stores `text` as the override for `id` and notifies every subscriber.
    ///
    /// Text equal to the default is still stored as an override. A write issued from inside a
    /// notification that matches the current override is an echo and is dropped silently. Writes
    /// nested deeper than the notification depth bound are rejected and logged.
    ///
    /// Returns `true` when the override changed and subscribers were notified.
    pub fn set_content(&self, id: &str, text: impl Into<String>) -> bool {
        let text = text.into();
        {
            let mut inner = self.inner.borrow_mut();
            if inner.notify_depth > 0 && inner.overrides.get(id) == Some(&text) {
                return false;
            }
            if inner.rejects_nested_write(id) {
                return false;
            }
            inner.overrides.insert(id.to_string(), text.clone());
            inner.queue_write(PendingWrite::Save {
                id: id.to_string(),
                text,
            });
        }
        self.notify(DocumentChange {
            id: id.to_string(),
            kind: ChangeKind::Edited,
        });
        true
    }

    /// Clears the override for `id`, restoring its default, and notifies every subscriber.
    ///
    /// Reverting a document without an override still notifies. From inside a notification it is
    /// an echo and is dropped. Reverts past the notification depth bound are rejected.
    pub fn revert_content(&self, id: &str) -> bool {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.notify_depth > 0 && !inner.overrides.contains_key(id) {
                return false;
            }
            if inner.rejects_nested_write(id) {
                return false;
            }
            inner.overrides.remove(id);
            inner.queue_write(PendingWrite::Delete { id: id.to_string() });
        }
        self.notify(DocumentChange {
            id: id.to_string(),
            kind: ChangeKind::Reverted,
        });
        true
    }

    /// Installs an override loaded from persistence without queueing it to be written back.
    ///
    /// Ids already overridden or reverted during this session keep their in-memory state.
    /// Returns `true` when the stored text was applied.
    pub(crate) fn apply_hydrated(&self, id: &str, text: String) -> bool {
        {
            let mut inner = self.inner.borrow_mut();
            let touched = inner.overrides.contains_key(id)
                || inner.pending_writes.iter().any(|queued| queued.id() == id)
                || inner.rejects_nested_write(id);
            if touched {
                return false;
            }
            inner.overrides.insert(id.to_string(), text);
        }
        self.notify(DocumentChange {
            id: id.to_string(),
            kind: ChangeKind::Hydrated,
        });
        true
    }

    pub fn subscribe(&self, callback: impl Fn(&DocumentChange) + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let subscription = Subscription(inner.next_subscription);
        inner.next_subscription = inner.next_subscription.saturating_add(1);
        inner.subscribers.insert(subscription, Rc::new(callback));
        subscription
    }

    /// Returns `false` when the subscription was already removed.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        self.inner
            .borrow_mut()
            .subscribers
            .remove(&subscription)
            .is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Takes the persistence work queued since the last call.
    pub fn take_pending_writes(&self) -> Vec<PendingWrite> {
        std::mem::take(&mut self.inner.borrow_mut().pending_writes)
    }

    /// Puts back a write that failed to persist, unless a newer one for the same id is queued.
    pub(crate) fn requeue_write(&self, write: PendingWrite) {
        let mut inner = self.inner.borrow_mut();
        if inner
            .pending_writes
            .iter()
            .any(|queued| queued.id() == write.id())
        {
            return;
        }
        inner.pending_writes.push(write);
    }

    fn notify(&self, change: DocumentChange) {
        let targets: Vec<Subscription> = {
            let mut inner = self.inner.borrow_mut();
            inner.notify_depth += 1;
            inner.subscribers.keys().copied().collect()
        };

        for subscription in targets {
            // Looked up per call so an unsubscribe made by an earlier callback takes effect now.
            let callback = self.inner.borrow().subscribers.get(&subscription).cloned();
            if let Some(callback) = callback {
                callback(&change);
            }
        }

        self.inner.borrow_mut().notify_depth -= 1;
    }
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("DocumentStore")
            .field("overrides", &inner.overrides)
            .field("subscribers", &inner.subscribers.len())
            .field("pending_writes", &inner.pending_writes.len())
            .finish()
    }
}
