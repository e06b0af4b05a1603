//! Browser (`wasm32`) implementations of [`platform_host`] service contracts.
//!
//! Non-wasm builds compile the same types with inert fallbacks so hosts and tests can construct
//! them on any target.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod storage;
pub mod timer;

pub use storage::local_documents::WebDocumentPersistence;
pub use timer::WebTimerService;
