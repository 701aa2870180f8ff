//! Overlap indexes for genomic intervals.
//!
//! Two single-sequence structures implement the [`Overlapper`] trait over closed
//! [`Span`]s:
//!
//! - [`AIList`]: an Augmented Interval List, good for high-coverage data where long
//!   intervals cover many short ones
//! - [`Bits`]: Binary Interval Search, good for general queries and sorted query streams
//!
//! [`OverlapDetector`] lifts either of them to a genome-wide index over arbitrary payloads.
//!
//! ## Quick Start
//!
//! ```rust
//! use gcoord_overlaprs::{AIList, Overlapper, Span};
//!
//! let spans = vec![
//!     Span { start: 100u32, end: 200, val: "gene1" },
//!     Span { start: 150, end: 300, val: "gene2" },
//!     Span { start: 400, end: 500, val: "gene3" },
//! ];
//!
//! let ailist = AIList::build(spans);
//! assert_eq!(ailist.find(180, 250).len(), 2);
//!
//! // both ends are inclusive
//! assert_eq!(ailist.find(300, 399).len(), 1);
//! ```

/// Augmented Interval List implementation.
///
/// See [`AIList`] for details.
pub mod ailist;

/// Binary Interval Search implementation.
///
/// See [`Bits`] for details.
pub mod bits;

/// Genome-wide overlap index.
pub mod detector;

/// Core traits for overlap operations.
///
/// See [`Overlapper`] for the main trait.
pub mod traits;

// re-exports
pub use self::ailist::AIList;
pub use self::bits::Bits;
pub use self::detector::OverlapDetector;
pub use self::traits::{Overlapper, Span};

/// The single-sequence structure an [`OverlapDetector`] builds for each sequence.
///
/// * `AIList` - Augmented Interval List. Best for high-coverage regions.
/// * `Bits` - Binary Interval Search. Best for general-purpose queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapperType {
    /// Use the Augmented Interval List implementation.
    #[default]
    AIList,
    /// Use the Binary Interval Search implementation.
    Bits,
}
