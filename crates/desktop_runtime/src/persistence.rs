//! Document persistence adapters: boot hydration and write-behind flushing of store overrides.
//!
//! The in-memory [`DocumentStore`] is authoritative for the session. Persistence failures are
//! logged and never roll back a mutation.

use platform_host::{load_document_with, save_document_with, DocumentPersistence};
use serde::{Deserialize, Serialize};

use crate::documents::{DocumentStore, PendingWrite};

pub const DOCUMENT_SCHEMA_VERSION: u32 = 1;
const DOCUMENT_KEY_PREFIX: &str = "retrodesk.document.v1.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct PersistedDocument {
    schema_version: u32,
    text: String,
}

/// Persistence key for a document id.
pub fn document_key(id: &str) -> String {
    format!("{DOCUMENT_KEY_PREFIX}{id}")
}

fn migrate_persisted_document(document: PersistedDocument) -> Option<String> {
    match document.schema_version {
        DOCUMENT_SCHEMA_VERSION => Some(document.text),
        _ => None,
    }
}

/// Loads stored overrides for `ids` into `store`. Returns how many were applied.
///
/// Missing, malformed, or unreadable entries leave the document on its default. Documents edited
/// or reverted while the load was in flight keep their in-memory text.
pub async fn hydrate_documents<P, I, S>(store: &DocumentStore, persistence: &P, ids: I) -> usize
where
    P: DocumentPersistence + ?Sized,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut applied = 0;
    for id in ids {
        let id = id.as_ref();
        let key = document_key(id);
        let loaded = match load_document_with::<_, PersistedDocument>(persistence, &key).await {
            Ok(loaded) => loaded,
            Err(err) => {
                leptos::logging::warn!("document hydrate failed for {id}: {err}");
                continue;
            }
        };
        let Some(document) = loaded else {
            continue;
        };
        let version = document.schema_version;
        match migrate_persisted_document(document) {
            Some(text) => {
                if store.apply_hydrated(id, text) {
                    applied += 1;
                }
            }
            None => {
                leptos::logging::warn!(
                    "document hydrate skipped {id}: unsupported schema version {version}"
                );
            }
        }
    }
    applied
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlushReport {
    pub saved: usize,
    pub deleted: usize,
    pub failed: usize,
}

/// Writes every queued override change to `persistence`.
///
/// Failed writes are logged and queued again unless a newer change for the same document was
/// queued while the flush was running.
pub async fn flush_documents<P>(store: &DocumentStore, persistence: &P) -> FlushReport
where
    P: DocumentPersistence + ?Sized,
{
    let mut report = FlushReport::default();
    for write in store.take_pending_writes() {
        let key = document_key(write.id());
        let result = match &write {
            PendingWrite::Save { text, .. } => {
                let payload = PersistedDocument {
                    schema_version: DOCUMENT_SCHEMA_VERSION,
                    text: text.clone(),
                };
                save_document_with(persistence, &key, &payload).await
            }
            PendingWrite::Delete { .. } => persistence.delete_document(&key).await,
        };
        let is_save = matches!(write, PendingWrite::Save { .. });
        match result {
            Ok(()) if is_save => report.saved += 1,
            Ok(()) => report.deleted += 1,
            Err(err) => {
                leptos::logging::warn!("document persist failed for {}: {err}", write.id());
                report.failed += 1;
                store.requeue_write(write);
            }
        }
    }
    report
}
