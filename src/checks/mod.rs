/// TLS leaf certificate fetcher
pub mod fetcher;

/// Certificate expiry classifier
pub mod expiry;

/// Batch runner driving all host checks
pub mod batch;
