//! Backing object store subsystem.
//!
//! # Data Flow
//! ```text
//! origin::ObjectServer
//!     → traits.rs (ObjectStore::get_object)
//!     → s3.rs (GetObject against the configured bucket)
//!     → StoredObject { meta, body stream } | StorageError
//! ```
//!
//! # Design Decisions
//! - Read-only: the gateway never writes to the store
//! - Errors are classified at the store boundary (not found, transient, timeout, fatal)
//! - Bodies are streamed, never buffered whole

pub mod error;
pub mod s3;
pub mod traits;

pub use error::{StorageError, StorageResult};
pub use s3::S3Store;
pub use traits::{ByteStream, ObjectMeta, ObjectResult, ObjectStore, StoredObject};
