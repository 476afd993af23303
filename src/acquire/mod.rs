//! Acquisition layer: download and unpack the build tool distribution
//!
//! # Modules
//!
//! - [`error`]: Error types for download and extraction
//! - [`extractor`]: Zip extraction into the working directory
//! - [`fetcher`]: Streaming HTTP download implementing [`source::ArchiveSource`]
//! - [`sanitize`]: Entry path resolution with zip-slip protection
//! - [`source`]: Trait for obtaining a distribution archive

pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod sanitize;
pub mod source;
