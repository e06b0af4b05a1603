//! Typed host-domain contracts shared by the desktop session runtime.
//!
//! This crate is the boundary between the session core and whatever environment hosts it. It
//! exposes the document persistence collaborator and the scheduled-callback service, each with a
//! no-op adapter for unsupported targets and an in-memory adapter for tests and headless hosts.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod storage;
pub mod timer;

pub use storage::documents::{
    load_document_with, save_document_with, DocumentPersistence, DocumentPersistenceFuture,
    MemoryDocumentPersistence, NoopDocumentPersistence,
};
pub use timer::{ManualTimerService, NoopTimerService, TimerCallback, TimerHandle, TimerService};
