//! Persistence collaborators: dedup store and append-only record writer.
//!
//! Two tables on one shared pool:
//! - `downloaded_ids` - set of work IDs whose download fully completed
//! - `works` - one appended row per processed work
//!
//! # Example
//!
//! ```ignore
//! use xhs_core::{Database, IdStore, RecordWriter};
//!
//! let db = Database::new(Path::new("xhs.db")).await?;
//! let ids = IdStore::new(db.clone());
//! if !ids.contains("abc123").await? {
//!     // ... download, then on full success:
//!     ids.add("abc123").await?;
//! }
//! ```

mod ids;
mod records;

pub use ids::IdStore;
pub use records::RecordWriter;

use thiserror::Error;

/// Persistence errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying database operation failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
