//! Desktop session core: window management, shared document content, hidden-gesture detection,
//! and marquee selection for the browser desktop.

pub mod document_view;
pub mod documents;
pub mod gesture;
pub mod input;
pub mod model;
pub mod persistence;
pub mod reducer;
pub mod runtime_context;
pub mod selection;
pub mod sequence;
pub mod window_manager;

pub use document_view::DocumentView;
pub use documents::{
    defaults_from, ChangeKind, DefaultContentProvider, DocumentChange, DocumentStore,
    PendingWrite, Subscription, WeakDocumentStore,
};
pub use gesture::HiddenGesture;
pub use model::*;
pub use persistence::{document_key, flush_documents, hydrate_documents, FlushReport};
pub use reducer::{reduce_desktop, DesktopAction, ReducerError, RuntimeEffect};
pub use runtime_context::DesktopSession;
pub use selection::{bounds, intersects, SelectionRect};
pub use sequence::{konami_sequence, InputToken, SequenceMatcher};
