pub mod dictionary;
pub mod interval;
pub mod named_interval;
pub mod span;

// re-export for cleaner imports
pub use self::dictionary::{SequenceDictionary, SequenceRecord};
pub use self::interval::{Interval, Locatable, compare_nulls_last};
pub use self::named_interval::{IntervalMeta, NamedInterval};
pub use self::span::Span;
