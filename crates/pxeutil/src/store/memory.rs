//! In-memory document store for unit testing
//!
//! Holds the document behind a mutex so tests can seed it, run a command,
//! and inspect the result without touching the filesystem.

use super::DocumentStore;
use crate::error::StoreError;
use pxe_records::PxeDocument;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

/// Mock document store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    document: Arc<Mutex<PxeDocument>>,
    saves: Arc<Mutex<usize>>,
    fail_saves: bool,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with `document`.
    pub fn with_document(document: PxeDocument) -> Self {
        Self {
            document: Arc::new(Mutex::new(document)),
            ..Self::default()
        }
    }

    /// Store whose saves always fail, for exercising storage error paths.
    pub fn failing_saves() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }

    /// Current document.
    pub fn document(&self) -> PxeDocument {
        self.document
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DocumentStore for MemoryStore {
    fn location(&self) -> String {
        "memory".to_string()
    }

    fn load(&self) -> Result<PxeDocument, StoreError> {
        Ok(self.document())
    }

    fn save(&self, document: &PxeDocument) -> Result<(), StoreError> {
        if self.fail_saves {
            return Err(StoreError::Write {
                path: PathBuf::from("memory"),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "saves disabled"),
            });
        }
        *self.document.lock().unwrap_or_else(PoisonError::into_inner) = document.clone();
        *self.saves.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(())
    }
}
