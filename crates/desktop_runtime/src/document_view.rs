//! Editor-side binding of one view to one document in the [`DocumentStore`].
//!
//! Local edits are written through to the store before anything else happens, and a view ignores
//! notifications whose content equals what it already shows. Together these keep a view from
//! replacing its own latest keystroke with an older snapshot.

use std::{cell::RefCell, rc::Rc};

use crate::documents::{DocumentStore, Subscription};

#[derive(Debug, Default)]
struct ViewState {
    document_id: Option<String>,
    text: String,
    remote_updates: u64,
}

#[derive(Debug)]
pub struct DocumentView {
    store: DocumentStore,
    state: Rc<RefCell<ViewState>>,
    subscription: Option<Subscription>,
}

impl DocumentView {
    /// Binds a new view to `document_id`, reading its content immediately.
    pub fn bind(store: &DocumentStore, document_id: &str) -> Self {
        let state = Rc::new(RefCell::new(ViewState {
            document_id: Some(document_id.to_string()),
            text: store.get_content(document_id),
            remote_updates: 0,
        }));

        let weak_state = Rc::downgrade(&state);
        let weak_store = store.downgrade();
        let subscription = store.subscribe(move |change| {
            let (Some(state), Some(store)) = (weak_state.upgrade(), weak_store.upgrade()) else {
                return;
            };
            if state.borrow().document_id.as_deref() != Some(change.id.as_str()) {
                return;
            }
            let latest = store.get_content(&change.id);
            let mut state = state.borrow_mut();
            if state.text == latest {
                return;
            }
            state.text = latest;
            state.remote_updates += 1;
        });

        Self {
            store: store.clone(),
            state,
            subscription: Some(subscription),
        }
    }

    pub fn document_id(&self) -> Option<String> {
        self.state.borrow().document_id.clone()
    }

    /// Text the view currently renders.
    pub fn text(&self) -> String {
        self.state.borrow().text.clone()
    }

    /// Number of times another writer changed what this view shows.
    pub fn remote_update_count(&self) -> u64 {
        self.state.borrow().remote_updates
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn is_edited(&self) -> bool {
        self.document_id()
            .map(|id| self.store.has_override(&id))
            .unwrap_or(false)
    }

    /// Applies a local edit. Returns `false` (and logs) when the view has been detached.
    pub fn edit(&self, text: impl Into<String>) -> bool {
        let Some(document_id) = self.attached_document_id("edit") else {
            return false;
        };
        let text = text.into();
        self.state.borrow_mut().text = text.clone();
        self.store.set_content(&document_id, text);
        true
    }

    /// Restores the bound document's default text for every view of it.
    pub fn revert(&self) -> bool {
        let Some(document_id) = self.attached_document_id("revert") else {
            return false;
        };
        self.store.revert_content(&document_id);
        true
    }

    /// Points the view at another document, reading its content immediately.
    pub fn rebind(&self, document_id: &str) -> bool {
        if self.subscription.is_none() {
            leptos::logging::warn!("document view: rebind to {document_id} after detach ignored");
            return false;
        }
        let text = self.store.get_content(document_id);
        let mut state = self.state.borrow_mut();
        state.document_id = Some(document_id.to_string());
        state.text = text;
        true
    }

    /// Stops observing the store. Later edits are ignored.
    pub fn detach(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            self.store.unsubscribe(subscription);
        }
        self.state.borrow_mut().document_id = None;
    }

    fn attached_document_id(&self, operation: &str) -> Option<String> {
        let document_id = self
            .subscription
            .and_then(|_| self.state.borrow().document_id.clone());
        if document_id.is_none() {
            leptos::logging::warn!("document view: {operation} on a detached view ignored");
        }
        document_id
    }
}

impl Drop for DocumentView {
    fn drop(&mut self) {
        self.detach();
    }
}
