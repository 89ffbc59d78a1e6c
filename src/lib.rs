//! Catalog - tracks grouped into mergeable collections.
//!
//! Collections are merged into brand-new collections, and every track
//! remembers how many times a merge has moved it. Identifiers resolve through
//! an open-addressed [`index::Index`]; the grouping is an augmented
//! disjoint-set [`forest::Forest`].
//!
//! # Quick Start
//!
//! ```
//! use catalog::Catalog;
//!
//! let mut catalog = Catalog::new();
//! catalog.create_collection(1).unwrap();
//! catalog.create_collection(2).unwrap();
//! catalog.create_track(10, 1).unwrap();
//! catalog.create_track(12, 2).unwrap();
//!
//! catalog.merge_collections(1, 2, 3).unwrap();
//! assert_eq!(catalog.size_of(3), Ok(2));
//! assert_eq!(catalog.collection_of(12), Ok(3));
//! assert_eq!(catalog.reassignments_of(12), Ok(1));
//! ```

mod catalog;
pub mod error;
pub mod forest;
pub mod index;

pub use catalog::Catalog;
pub use error::Error;
pub use error::Result;
