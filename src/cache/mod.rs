// Cache module for the persistent LOC record file.
// Stores per-repository commit fingerprints and line counts between runs.

pub mod paths;
pub mod record;
pub mod store;

pub use paths::*;
pub use record::{CacheFile, CacheRecord, digest};
pub use store::{CacheStore, read_text, write_text};
