//! Session container wiring the reducer, document store, views, and hidden gesture together.
//!
//! [`DesktopSession`] owns the long-lived session state and the effect queue. The host renders
//! from it and forwards chrome and input events into it; UI composition lives elsewhere.

use std::{collections::BTreeMap, rc::Rc};

use platform_host::TimerService;
use platform_host_web::WebTimerService;

use crate::{
    document_view::DocumentView,
    documents::{DefaultContentProvider, DocumentStore},
    gesture::HiddenGesture,
    input::token_for_key,
    model::{DesktopState, InteractionState, SessionPreferences, WindowId},
    reducer::{reduce_desktop, DesktopAction, RuntimeEffect},
};

pub struct DesktopSession {
    state: DesktopState,
    interaction: InteractionState,
    effects: Vec<RuntimeEffect>,
    documents: DocumentStore,
    views: BTreeMap<WindowId, DocumentView>,
    gesture: HiddenGesture,
}

impl DesktopSession {
    pub fn new(
        defaults: impl DefaultContentProvider + 'static,
        timers: Rc<dyn TimerService>,
        preferences: SessionPreferences,
    ) -> Self {
        let documents = DocumentStore::with_max_notify_depth(defaults, preferences.max_notify_depth);
        let gesture = HiddenGesture::new(
            preferences.hidden_sequence.clone(),
            preferences.gesture_pulse_ms,
            timers,
        );
        let state = DesktopState {
            preferences,
            ..DesktopState::default()
        };
        Self {
            state,
            interaction: InteractionState::default(),
            effects: Vec::new(),
            documents,
            views: BTreeMap::new(),
            gesture,
        }
    }

    /// Session whose hidden-gesture pulse resets on browser `setTimeout` callbacks.
    pub fn with_browser_timers(
        defaults: impl DefaultContentProvider + 'static,
        preferences: SessionPreferences,
    ) -> Self {
        Self::new(defaults, Rc::new(WebTimerService::default()), preferences)
    }

    pub fn state(&self) -> &DesktopState {
        &self.state
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    /// Shared document store handle.
    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    pub fn gesture(&self) -> &HiddenGesture {
        &self.gesture
    }

    /// Document view hosted by `window_id`, if that window shows a document.
    pub fn view(&self, window_id: WindowId) -> Option<&DocumentView> {
        self.views.get(&window_id)
    }

    /// Runs `action` through the reducer.
    ///
    /// Returns `true` when state or interaction changed, so hosts can skip redundant renders.
    /// Reducer errors are logged and leave the session untouched.
    pub fn dispatch(&mut self, action: DesktopAction) -> bool {
        let mut desktop = self.state.clone();
        let mut ui = self.interaction.clone();

        match reduce_desktop(&mut desktop, &mut ui, action) {
            Ok(new_effects) => {
                let windows_changed = desktop.windows != self.state.windows;
                let changed = desktop != self.state || ui != self.interaction;
                self.state = desktop;
                self.interaction = ui;
                if windows_changed {
                    self.sync_document_views();
                }
                self.effects.extend(new_effects);
                changed
            }
            Err(err) => {
                leptos::logging::warn!("desktop reducer error: {err}");
                false
            }
        }
    }

    /// Drains effects queued by earlier dispatches, in order.
    pub fn take_effects(&mut self) -> Vec<RuntimeEffect> {
        std::mem::take(&mut self.effects)
    }

    /// Feeds a key press to the hidden-gesture matcher. Returns `true` when it fired.
    pub fn handle_key(&mut self, key: &str, repeat: bool) -> bool {
        match token_for_key(key, repeat) {
            Some(token) => self.gesture.handle_input(token),
            None => false,
        }
    }

    pub fn toggle_gesture_latch(&self) -> bool {
        self.gesture.toggle_latch()
    }

    /// Applies an edit typed into a window's document view.
    pub fn edit_document(&self, window_id: WindowId, text: impl Into<String>) -> bool {
        match self.views.get(&window_id) {
            Some(view) => view.edit(text),
            None => {
                leptos::logging::warn!("edit for window {window_id:?} without a document view");
                false
            }
        }
    }

    /// Binds views for new document windows and drops views whose windows closed.
    fn sync_document_views(&mut self) {
        let windows = &self.state.windows;
        self.views.retain(|window_id, view| {
            windows.iter().any(|w| {
                w.id == *window_id && w.document_id.is_some() && w.document_id == view.document_id()
            })
        });
        for window in windows {
            let Some(document_id) = window.document_id.as_deref() else {
                continue;
            };
            if !self.views.contains_key(&window.id) {
                self.views
                    .insert(window.id, DocumentView::bind(&self.documents, document_id));
            }
        }
    }
}

impl std::fmt::Debug for DesktopSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DesktopSession")
            .field("state", &self.state)
            .field("interaction", &self.interaction)
            .field("effects", &self.effects)
            .field("documents", &self.documents)
            .field("views", &self.views.len())
            .field("gesture", &self.gesture)
            .finish()
    }
}
