//! Segue Metadata
//!
//! Tag reading and best-effort tag writing for the stitched output.
//!
//! `LoftyTagStore` implements both `TagReader` and `TagWriter` from
//! `segue-core` over a fixed set of common keys (see [`keys::SUPPORTED_KEYS`]).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod keys;
pub mod store;

pub use error::{MetadataError, Result};
pub use keys::{item_key, key_name, SUPPORTED_KEYS};
pub use store::LoftyTagStore;
