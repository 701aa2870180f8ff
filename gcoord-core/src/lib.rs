//! Core value types shared by every gcoord crate.
//!
//! - [`Interval`]: a 1-based, closed range on a named sequence
//! - [`NamedInterval`]: an [`Interval`] plus an optional name and a strand flag
//! - [`SequenceDictionary`]: the ordered `(name, length)` records defining a coordinate system
//! - [`Span`]: the bare `[start, end]` + value element stored by the overlap structures
//!
//! ```rust
//! use gcoord_core::models::{Interval, Locatable};
//!
//! let a = Interval::new("chr1", 100, 200);
//! let b = Interval::new("chr1", 150, 300);
//! assert!(a.intersects(&b));
//! assert_eq!(a.intersection_length(&b), 51);
//! ```
pub mod errors;
pub mod models;

pub use errors::*;
