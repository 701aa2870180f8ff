//! Named interval lists over a sequence dictionary, and their set algebra.
//!
//! ```rust
//! use std::sync::Arc;
//! use gcoord_core::models::{NamedInterval, SequenceDictionary};
//! use gcoord_intervallist::NamedIntervalList;
//!
//! let dictionary = Arc::new(SequenceDictionary::try_from(vec![("chr1".to_string(), 1000)]).unwrap());
//!
//! let mut targets = NamedIntervalList::new(dictionary.clone());
//! targets.add(NamedInterval::new("chr1", 1, 100)).unwrap();
//! targets.add(NamedInterval::new("chr1", 101, 200)).unwrap();
//!
//! let mut blacklist = NamedIntervalList::new(dictionary);
//! blacklist.add(NamedInterval::new("chr1", 150, 160)).unwrap();
//!
//! let kept = NamedIntervalList::subtract(&[&targets], &[&blacklist]).unwrap();
//! assert_eq!(kept.len(), 2);
//! assert_eq!(kept.base_count(), 189);
//! ```
pub mod algebra;
pub mod errors;
pub mod io;
pub mod list;
pub mod sites;

// re-exports
pub use self::errors::IntervalListError;
pub use self::list::NamedIntervalList;
pub use self::sites::VariantSite;
