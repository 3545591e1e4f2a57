//! Document storage
//!
//! Images and menus share one document. [`DocumentStore`] is the seam
//! between the registries and where that document lives: [`YamlFileStore`]
//! in production, and an in-memory store for unit tests.

mod yaml;
#[cfg(any(test, feature = "test-util"))]
mod memory;

pub use yaml::YamlFileStore;
#[cfg(any(test, feature = "test-util"))]
pub use memory::MemoryStore;

use crate::error::StoreError;
use pxe_records::PxeDocument;

/// Load/save access to the persisted document.
///
/// Each command performs at most one load-modify-save cycle. There is no
/// locking: when two processes race, the later save wins.
pub trait DocumentStore {
    /// Human readable location, for log and error messages.
    fn location(&self) -> String;

    /// Read the document. A missing or empty document is an empty
    /// [`PxeDocument`], never an error.
    fn load(&self) -> Result<PxeDocument, StoreError>;

    /// Replace the stored document.
    fn save(&self, document: &PxeDocument) -> Result<(), StoreError>;
}
