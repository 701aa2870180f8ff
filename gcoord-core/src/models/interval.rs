use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::str::FromStr;

use crate::errors::IntervalParseError;

/// Anything that sits on a named sequence at a 1-based, closed `[start, end]` range.
///
/// Ordering, equality and hashing of every coordinate-bearing type in this crate go
/// through [`Locatable::coordinate_key`], so sorted containers and hashed containers
/// always agree about which values are the same.
pub trait Locatable {
    fn sequence(&self) -> &str;
    fn start(&self) -> u32;
    fn end(&self) -> u32;

    /// The `(sequence, start, end)` triple that defines order and identity.
    #[inline]
    fn coordinate_key(&self) -> (&str, u32, u32) {
        (self.sequence(), self.start(), self.end())
    }

    /// Sequence name (lexicographic), then start, then end.
    #[inline]
    fn compare_coordinates<L: Locatable + ?Sized>(&self, other: &L) -> Ordering {
        self.coordinate_key().cmp(&other.coordinate_key())
    }

    /// Number of bases covered. Degenerate intervals (`end < start`) have length 0.
    #[inline]
    fn length(&self) -> u32 {
        if self.end() >= self.start() {
            self.end() - self.start() + 1
        } else {
            0
        }
    }

    /// Same sequence and numerically overlapping ranges.
    #[inline]
    fn intersects<L: Locatable + ?Sized>(&self, other: &L) -> bool {
        self.sequence() == other.sequence()
            && self.start() <= other.end()
            && other.start() <= self.end()
    }

    /// Number of shared bases, 0 when the intervals do not intersect.
    #[inline]
    fn intersection_length<L: Locatable + ?Sized>(&self, other: &L) -> u32 {
        if !self.intersects(other) {
            return 0;
        }
        // a degenerate side can intersect while sharing no base
        self.end()
            .min(other.end())
            .checked_sub(self.start().max(other.start()))
            .map_or(0, |d| d + 1)
    }

    /// True when `other` lies completely inside this interval.
    #[inline]
    fn contains<L: Locatable + ?Sized>(&self, other: &L) -> bool {
        self.sequence() == other.sequence()
            && self.start() <= other.start()
            && other.end() <= self.end()
    }

    /// True when the two intervals are adjacent on the same sequence without sharing a base.
    #[inline]
    fn abuts<L: Locatable + ?Sized>(&self, other: &L) -> bool {
        self.sequence() == other.sequence()
            && (self.end().checked_add(1) == Some(other.start())
                || other.end().checked_add(1) == Some(self.start()))
    }
}

/// Implements `PartialEq`, `Eq`, `PartialOrd`, `Ord` and `Hash` from the coordinate key.
macro_rules! impl_coordinate_order {
    ($ty:ty) => {
        impl PartialEq for $ty {
            #[inline]
            fn eq(&self, other: &Self) -> bool {
                self.compare_coordinates(other) == std::cmp::Ordering::Equal
            }
        }

        impl Eq for $ty {}

        impl PartialOrd for $ty {
            #[inline]
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $ty {
            #[inline]
            fn cmp(&self, other: &Self) -> std::cmp::Ordering {
                self.compare_coordinates(other)
            }
        }

        impl std::hash::Hash for $ty {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                self.coordinate_key().hash(state);
            }
        }
    };
}

pub(crate) use impl_coordinate_order;

///
/// A range `[start, end]` on a named sequence, 1-based and closed-ended.
///
/// A single base has `start == end`.
///
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interval {
    sequence: String,
    start: u32,
    end: u32,
}

impl Interval {
    pub fn new(sequence: impl Into<String>, start: u32, end: u32) -> Self {
        Interval {
            sequence: sequence.into(),
            start,
            end,
        }
    }
}

impl Locatable for Interval {
    #[inline]
    fn sequence(&self) -> &str {
        &self.sequence
    }

    #[inline]
    fn start(&self) -> u32 {
        self.start
    }

    #[inline]
    fn end(&self) -> u32 {
        self.end
    }
}

impl_coordinate_order!(Interval);

impl Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.sequence, self.start, self.end)
    }
}

impl FromStr for Interval {
    type Err = IntervalParseError;

    ///
    /// Parse `sequence:start-end`. The sequence name may itself contain `:`.
    ///
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (sequence, range) = s
            .rsplit_once(':')
            .ok_or_else(|| IntervalParseError::Malformed(s.to_string()))?;
        let (start, end) = range
            .split_once('-')
            .ok_or_else(|| IntervalParseError::Malformed(s.to_string()))?;

        if sequence.is_empty() {
            return Err(IntervalParseError::Malformed(s.to_string()));
        }

        let parse = |v: &str| {
            v.trim()
                .replace(',', "")
                .parse::<u32>()
                .map_err(|_| IntervalParseError::InvalidCoordinate(s.to_string()))
        };

        Ok(Interval::new(sequence, parse(start)?, parse(end)?))
    }
}

/// Compare two optional intervals with absent values sorting after every present one.
pub fn compare_nulls_last<L: Locatable>(a: Option<&L>, b: Option<&L>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.compare_coordinates(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::collections::{BTreeSet, HashSet};

    #[rstest]
    #[case(("chr1", 1, 100), ("chr1", 50, 150), true)]
    #[case(("chr1", 1, 100), ("chr1", 100, 150), true)]
    #[case(("chr1", 1, 100), ("chr1", 101, 150), false)]
    #[case(("chr1", 1, 100), ("chr2", 1, 100), false)]
    #[case(("chr1", 10, 10), ("chr1", 10, 10), true)]
    #[case(("chr1", 5, 20), ("chr1", 8, 9), true)]
    fn test_intersects_is_symmetric(
        #[case] a: (&str, u32, u32),
        #[case] b: (&str, u32, u32),
        #[case] expected: bool,
    ) {
        let a = Interval::new(a.0, a.1, a.2);
        let b = Interval::new(b.0, b.1, b.2);
        assert_eq!(a.intersects(&b), expected);
        assert_eq!(b.intersects(&a), expected);
    }

    #[rstest]
    #[case(("chr1", 1, 100), ("chr1", 50, 150), 51)]
    #[case(("chr1", 1, 100), ("chr1", 100, 150), 1)]
    #[case(("chr1", 1, 100), ("chr1", 101, 150), 0)]
    #[case(("chr1", 1, 100), ("chrX", 1, 100), 0)]
    #[case(("chr1", 20, 30), ("chr1", 1, 100), 11)]
    #[case(("chr1", 10, 9), ("chr1", 9, 10), 0)]
    fn test_intersection_length(
        #[case] a: (&str, u32, u32),
        #[case] b: (&str, u32, u32),
        #[case] expected: u32,
    ) {
        let a = Interval::new(a.0, a.1, a.2);
        let b = Interval::new(b.0, b.1, b.2);
        assert_eq!(a.intersection_length(&b), expected);
        assert_eq!(b.intersection_length(&a), expected);
    }

    #[rstest]
    fn test_ordering_agrees_with_equality() {
        let intervals = vec![
            Interval::new("chr2", 5, 10),
            Interval::new("chr1", 5, 10),
            Interval::new("chr1", 5, 9),
            Interval::new("chr10", 1, 2),
            Interval::new("chr1", 5, 10),
        ];

        for a in &intervals {
            for b in &intervals {
                assert_eq!(a.cmp(b) == Ordering::Equal, a == b);
            }
        }

        let sorted: BTreeSet<Interval> = intervals.iter().cloned().collect();
        let hashed: HashSet<Interval> = intervals.iter().cloned().collect();
        assert_eq!(sorted.len(), 4);
        assert_eq!(hashed.len(), 4);

        let order: Vec<String> = sorted.iter().map(|i| i.to_string()).collect();
        assert_eq!(
            order,
            vec!["chr1:5-9", "chr1:5-10", "chr10:1-2", "chr2:5-10"]
        );
    }

    #[rstest]
    fn test_nulls_sort_last() {
        let a = Interval::new("chrZ", 100, 200);
        let mut values = vec![None, Some(&a), None];
        values.sort_by(|x, y| compare_nulls_last(*x, *y));
        assert_eq!(values, vec![Some(&a), None, None]);
    }

    #[rstest]
    fn test_length_contains_abuts() {
        let a = Interval::new("chr1", 100, 200);
        assert_eq!(a.length(), 101);
        assert_eq!(Interval::new("chr1", 10, 9).length(), 0);
        assert!(a.contains(&Interval::new("chr1", 150, 200)));
        assert!(!a.contains(&Interval::new("chr1", 150, 201)));
        assert!(a.abuts(&Interval::new("chr1", 201, 300)));
        assert!(a.abuts(&Interval::new("chr1", 1, 99)));
        assert!(!a.abuts(&Interval::new("chr1", 200, 300)));
    }

    #[rstest]
    #[case("chr1:100-200", Interval::new("chr1", 100, 200))]
    #[case("HLA-A*01:01:1,000-2,000", Interval::new("HLA-A*01:01", 1000, 2000))]
    fn test_parse_interval(#[case] input: &str, #[case] expected: Interval) {
        let parsed: Interval = input.parse().unwrap();
        assert_eq!(parsed, expected);
        assert_eq!(parsed.sequence(), expected.sequence());
    }

    #[rstest]
    #[case("chr1")]
    #[case(":1-2")]
    #[case("chr1:a-2")]
    fn test_parse_interval_errors(#[case] input: &str) {
        assert!(input.parse::<Interval>().is_err());
    }
}
