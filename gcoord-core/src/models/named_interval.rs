use std::fmt::{self, Display};

use super::interval::{Interval, Locatable, impl_coordinate_order};

///
/// Metadata carried alongside the coordinates of a [`NamedInterval`].
///
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntervalMeta {
    pub name: Option<String>,
    pub negative_strand: bool,
}

///
/// An [`Interval`] with an optional display name and a strand flag.
///
/// Name and strand do not take part in ordering, equality or hashing; two named
/// intervals at the same coordinates compare equal whatever they are called.
///
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NamedInterval {
    interval: Interval,
    meta: IntervalMeta,
}

impl NamedInterval {
    pub fn new(sequence: impl Into<String>, start: u32, end: u32) -> Self {
        NamedInterval {
            interval: Interval::new(sequence, start, end),
            meta: IntervalMeta::default(),
        }
    }

    pub fn with_meta(
        sequence: impl Into<String>,
        start: u32,
        end: u32,
        negative_strand: bool,
        name: Option<String>,
    ) -> Self {
        NamedInterval {
            interval: Interval::new(sequence, start, end),
            meta: IntervalMeta {
                name,
                negative_strand,
            },
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.meta.name = Some(name.into());
        self
    }

    pub fn with_strand(mut self, negative_strand: bool) -> Self {
        self.meta.negative_strand = negative_strand;
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.meta.name.as_deref()
    }

    pub fn is_negative_strand(&self) -> bool {
        self.meta.negative_strand
    }

    pub fn strand_char(&self) -> char {
        if self.meta.negative_strand { '-' } else { '+' }
    }

    pub fn meta(&self) -> &IntervalMeta {
        &self.meta
    }

    pub fn interval(&self) -> &Interval {
        &self.interval
    }

    pub fn into_interval(self) -> Interval {
        self.interval
    }
}

impl From<Interval> for NamedInterval {
    fn from(interval: Interval) -> Self {
        NamedInterval {
            interval,
            meta: IntervalMeta::default(),
        }
    }
}

impl Locatable for NamedInterval {
    #[inline]
    fn sequence(&self) -> &str {
        self.interval.sequence()
    }

    #[inline]
    fn start(&self) -> u32 {
        self.interval.start()
    }

    #[inline]
    fn end(&self) -> u32 {
        self.interval.end()
    }
}

impl_coordinate_order!(NamedInterval);

impl Display for NamedInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}",
            self.interval,
            self.strand_char(),
            self.name().unwrap_or(".")
        )
    }
}
