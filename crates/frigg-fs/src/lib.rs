//! Filesystem abstraction for frigg.
//!
//! The parameter store, rule loader and CLI never touch `std::fs` directly.
//! They go through the [`FileSystem`] trait so the same code runs against the
//! real disk ([`NativeFileSystem`]) or an in-memory map ([`MemoryFileSystem`],
//! used by tests).
//!
//! # Example
//!
//! ```no_run
//! use frigg_fs::{FileSystem, NativeFileSystem};
//! use std::path::Path;
//!
//! # #[tokio::main]
//! # async fn main() -> std::io::Result<()> {
//! let fs = NativeFileSystem::new();
//! if fs.exists(Path::new("script.sql.json")).await? {
//!     let contents = fs.read_to_string(Path::new("script.sql.json")).await?;
//!     println!("{}", contents);
//! }
//! # Ok(())
//! # }
//! ```

mod file_system;
pub use file_system::{FileMetadata, FileSystem};

#[cfg(feature = "native")]
pub mod native;
#[cfg(feature = "native")]
pub use native::NativeFileSystem;

#[cfg(feature = "memory")]
pub mod memory;
#[cfg(feature = "memory")]
pub use memory::MemoryFileSystem;

#[cfg(feature = "native")]
pub use NativeFileSystem as DefaultFileSystem;

#[cfg(all(not(feature = "native"), feature = "memory"))]
pub use MemoryFileSystem as DefaultFileSystem;
