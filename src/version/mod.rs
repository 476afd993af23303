//! Version resolution layer
//!
//! Discovers which release of the build tool to install.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ IndexScraper│────▶│ListingParser│────▶│  highest()  │
//! │   (fetch)   │     │  (extract)  │     │  (compare)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`comparator`]: Multi-component numeric selection of the highest version
//! - [`error`]: Error type for resolution failures
//! - [`index`]: Directory-listing scraper implementing [`source::VersionSource`]
//! - [`source`]: Trait for discovering the latest version
//! - [`types`]: `VersionString`, `CandidateSet` and `ResolvedVersion`

pub mod comparator;
pub mod error;
pub mod index;
pub mod source;
pub mod types;
