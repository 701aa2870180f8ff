//! Coordinate liftover between assemblies through alignment chains.
//!
//! - [`Chain`]: one alignment chain, with the UCSC chain text format on both sides
//! - [`LiftOver`]: an index of chains answering interval mapping queries
//! - [`LiftOverConfig`]: the TOML-loadable settings of a [`LiftOver`]
//!
//! ```rust
//! use std::io::Cursor;
//! use gcoord_core::models::Interval;
//! use gcoord_liftover::{Chain, LiftOver};
//!
//! let text = "chain 100 chr1 1000 + 100 200 chr1 1000 + 300 400 1\n100\n";
//! let chains = Chain::read_chains(Cursor::new(text)).unwrap();
//! let lift = LiftOver::new(chains);
//!
//! let lifted = lift.lift_over(&Interval::new("chr1", 101, 150)).unwrap();
//! assert_eq!(lifted.interval, Interval::new("chr1", 301, 350));
//! ```
pub mod chain;
pub mod config;
pub mod errors;
pub mod lift;

// re-exports
pub use self::chain::{Block, Chain, ChainHeader, ChainSegment, Strand};
pub use self::config::LiftOverConfig;
pub use self::errors::{ChainError, LiftOverError};
pub use self::lift::{LiftOver, Liftover, PartialLiftover};
