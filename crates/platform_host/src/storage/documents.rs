//! Document override persistence contracts and adapters.

use std::{cell::RefCell, collections::HashMap, future::Future, pin::Pin, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};

/// Object-safe boxed future used by [`DocumentPersistence`] async methods.
pub type DocumentPersistenceFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host service that keeps document overrides alive across page reloads.
///
/// Values are raw JSON text stored per key. Callers own the key namespace.
pub trait DocumentPersistence {
    /// Loads the raw stored payload for `key`, or `None` when nothing is stored.
    fn load_document<'a>(
        &'a self,
        key: &'a str,
    ) -> DocumentPersistenceFuture<'a, Result<Option<String>, String>>;

    /// Stores a raw payload for `key`, replacing any previous value.
    fn save_document<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> DocumentPersistenceFuture<'a, Result<(), String>>;

    /// Removes the stored payload for `key`. Removing a missing key succeeds.
    fn delete_document<'a>(&'a self, key: &'a str)
        -> DocumentPersistenceFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Persistence adapter that stores nothing, for sessions without durable storage.
pub struct NoopDocumentPersistence;

impl DocumentPersistence for NoopDocumentPersistence {
    fn load_document<'a>(
        &'a self,
        _key: &'a str,
    ) -> DocumentPersistenceFuture<'a, Result<Option<String>, String>> {
        Box::pin(async { Ok(None) })
    }

    fn save_document<'a>(
        &'a self,
        _key: &'a str,
        _raw_json: &'a str,
    ) -> DocumentPersistenceFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn delete_document<'a>(
        &'a self,
        _key: &'a str,
    ) -> DocumentPersistenceFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory persistence adapter. Clones share the same backing map.
pub struct MemoryDocumentPersistence {
    inner: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryDocumentPersistence {
    /// Returns the raw payload currently stored for `key`.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.borrow().get(key).cloned()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Returns `true` when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}

impl DocumentPersistence for MemoryDocumentPersistence {
    fn load_document<'a>(
        &'a self,
        key: &'a str,
    ) -> DocumentPersistenceFuture<'a, Result<Option<String>, String>> {
        Box::pin(async move { Ok(self.raw(key)) })
    }

    fn save_document<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> DocumentPersistenceFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner
                .borrow_mut()
                .insert(key.to_string(), raw_json.to_string());
            Ok(())
        })
    }

    fn delete_document<'a>(
        &'a self,
        key: &'a str,
    ) -> DocumentPersistenceFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner.borrow_mut().remove(key);
            Ok(())
        })
    }
}

/// Loads and deserializes a typed document payload through a [`DocumentPersistence`] adapter.
///
/// # Errors
///
/// Returns an error when the adapter fails or the stored JSON does not match `T`.
pub async fn load_document_with<S: DocumentPersistence + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>, String> {
    let Some(raw) = store.load_document(key).await? else {
        return Ok(None);
    };
    let value = serde_json::from_str(&raw).map_err(|e| e.to_string())?;
    Ok(Some(value))
}

/// Serializes and saves a typed document payload through a [`DocumentPersistence`] adapter.
///
/// # Errors
///
/// Returns an error when serialization or the adapter save fails.
pub async fn save_document_with<S: DocumentPersistence + ?Sized, T: Serialize>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), String> {
    let raw = serde_json::to_string(value).map_err(|e| e.to_string())?;
    store.save_document(key, &raw).await
}
