//! Genome-wide overlap index over arbitrary payloads.
//!
//! [`OverlapDetector`] keeps one single-sequence [`Overlapper`] per sequence name. The
//! per-sequence structures only store indices into one owned item vector, so an item
//! registered under several intervals is stored (and reported) once.
//!
//! ```
//! use gcoord_core::models::Interval;
//! use gcoord_overlaprs::OverlapDetector;
//!
//! let detector = OverlapDetector::build(vec![
//!     (Interval::new("chr1", 1000, 2000), "BRCA1"),
//!     (Interval::new("chr1", 5000, 6000), "TP53"),
//!     (Interval::new("chr2", 1000, 3000), "EGFR"),
//! ]);
//!
//! let hits = detector.query_overlaps(&Interval::new("chr1", 1500, 5000));
//! assert_eq!(hits.len(), 2);
//! assert!(detector.query_overlaps(&Interval::new("chrX", 1, 10)).is_empty());
//! ```

use std::collections::HashMap;
use std::fmt::{self, Debug};

use gcoord_core::models::{Interval, Locatable};

use crate::{AIList, Bits, Overlapper, OverlapperType, Span};

pub struct OverlapDetector<T> {
    index_maps: HashMap<String, Box<dyn Overlapper<u32, usize>>>,
    items: Vec<T>,
    overlapper_type: OverlapperType,
}

impl<T> OverlapDetector<T> {
    /// Index every `(interval, item)` pair with the default [`OverlapperType`].
    pub fn build<It>(entries: It) -> Self
    where
        It: IntoIterator<Item = (Interval, T)>,
    {
        Self::with_overlapper_type(
            entries.into_iter().map(|(iv, item)| (vec![iv], item)),
            OverlapperType::default(),
        )
    }

    /// Index items that each cover one or more intervals.
    pub fn build_multi<It>(entries: It) -> Self
    where
        It: IntoIterator<Item = (Vec<Interval>, T)>,
    {
        Self::with_overlapper_type(entries, OverlapperType::default())
    }

    /// Index items that each cover one or more intervals, choosing the per-sequence structure.
    pub fn with_overlapper_type<It>(entries: It, overlapper_type: OverlapperType) -> Self
    where
        It: IntoIterator<Item = (Vec<Interval>, T)>,
    {
        let mut items = Vec::new();
        let mut spans: HashMap<String, Vec<Span<u32, usize>>> = HashMap::new();

        // STEP 1: bucket spans by sequence, each pointing at its item
        for (intervals, item) in entries {
            let idx = items.len();
            items.push(item);
            for iv in intervals {
                spans.entry(iv.sequence().to_string()).or_default().push(Span {
                    start: iv.start(),
                    end: iv.end(),
                    val: idx,
                });
            }
        }

        // STEP 2: one overlapper per sequence
        let index_maps = spans
            .into_iter()
            .map(|(seq, seq_spans)| {
                let lapper: Box<dyn Overlapper<u32, usize>> = match overlapper_type {
                    OverlapperType::Bits => Box::new(Bits::build(seq_spans)),
                    OverlapperType::AIList => Box::new(AIList::build(seq_spans)),
                };
                (seq, lapper)
            })
            .collect();

        OverlapDetector {
            index_maps,
            items,
            overlapper_type,
        }
    }

    /// Every item with at least one interval intersecting `query`, each reported once.
    pub fn query_overlaps<L: Locatable + ?Sized>(&self, query: &L) -> Vec<&T> {
        let Some(lapper) = self.index_maps.get(query.sequence()) else {
            return Vec::new();
        };

        let mut idxs: Vec<usize> = lapper
            .find_iter(query.start(), query.end())
            .map(|span| span.val)
            .collect();
        idxs.sort_unstable();
        idxs.dedup();
        idxs.into_iter().map(|i| &self.items[i]).collect()
    }

    /// True when any stored interval intersects `query`.
    pub fn overlaps_any<L: Locatable + ?Sized>(&self, query: &L) -> bool {
        self.index_maps
            .get(query.sequence())
            .is_some_and(|lapper| lapper.find_iter(query.start(), query.end()).next().is_some())
    }

    /// Every stored item exactly once, in insertion order.
    pub fn get_all(&self) -> Vec<&T> {
        self.items.iter().collect()
    }

    /// Number of distinct items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Names of the sequences that carry at least one interval.
    pub fn sequences(&self) -> impl Iterator<Item = &str> {
        self.index_maps.keys().map(String::as_str)
    }

    pub fn overlapper_type(&self) -> OverlapperType {
        self.overlapper_type
    }
}

impl<T> Default for OverlapDetector<T> {
    fn default() -> Self {
        Self::build(std::iter::empty())
    }
}

impl<T: Debug> Debug for OverlapDetector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlapDetector")
            .field("overlapper_type", &self.overlapper_type)
            .field("sequences", &self.index_maps.len())
            .field("items", &self.items)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn detector(overlapper_type: OverlapperType) -> OverlapDetector<&'static str> {
        OverlapDetector::with_overlapper_type(
            vec![
                (vec![Interval::new("chr1", 100, 200)], "a"),
                (vec![Interval::new("chr1", 300, 400)], "b"),
                (vec![Interval::new("chr1", 600, 800)], "c"),
                (vec![Interval::new("chr2", 100, 200)], "d"),
            ],
            overlapper_type,
        )
    }

    fn sorted<'a>(mut hits: Vec<&&'a str>) -> Vec<&'a str> {
        hits.sort();
        hits.into_iter().copied().collect()
    }

    #[rstest]
    #[case(OverlapperType::AIList)]
    #[case(OverlapperType::Bits)]
    fn test_basic_overlaps(#[case] overlapper_type: OverlapperType) {
        let d = detector(overlapper_type);
        let hits = d.query_overlaps(&Interval::new("chr1", 110, 210));
        assert_eq!(sorted(hits), vec!["a"]);
    }

    #[rstest]
    #[case(OverlapperType::AIList)]
    #[case(OverlapperType::Bits)]
    fn test_closed_bounds(#[case] overlapper_type: OverlapperType) {
        let d = detector(overlapper_type);
        assert_eq!(sorted(d.query_overlaps(&Interval::new("chr1", 200, 300))), vec!["a", "b"]);
        assert!(d.query_overlaps(&Interval::new("chr1", 201, 299)).is_empty());
        assert_eq!(sorted(d.query_overlaps(&Interval::new("chr1", 800, 800))), vec!["c"]);
    }

    #[rstest]
    #[case(OverlapperType::AIList)]
    #[case(OverlapperType::Bits)]
    fn test_unknown_sequence(#[case] overlapper_type: OverlapperType) {
        let d = detector(overlapper_type);
        assert!(d.query_overlaps(&Interval::new("chr3", 100, 200)).is_empty());
        assert!(!d.overlaps_any(&Interval::new("chr3", 100, 200)));
        assert!(d.overlaps_any(&Interval::new("chr2", 200, 200)));
    }

    #[rstest]
    #[case(OverlapperType::AIList)]
    #[case(OverlapperType::Bits)]
    fn test_multi_interval_item_reported_once(#[case] overlapper_type: OverlapperType) {
        let d = OverlapDetector::with_overlapper_type(
            vec![
                (
                    vec![
                        Interval::new("chr1", 100, 200),
                        Interval::new("chr1", 150, 250),
                        Interval::new("chr2", 1, 10),
                    ],
                    "gene",
                ),
                (vec![Interval::new("chr1", 180, 190)], "exon"),
            ],
            overlapper_type,
        );

        assert_eq!(sorted(d.query_overlaps(&Interval::new("chr1", 160, 185))), vec!["exon", "gene"]);
        assert_eq!(d.get_all(), vec![&"gene", &"exon"]);
        assert_eq!(d.len(), 2);

        let mut seqs: Vec<&str> = d.sequences().collect();
        seqs.sort();
        assert_eq!(seqs, vec!["chr1", "chr2"]);
    }

    #[rstest]
    fn test_duplicate_pairs_are_distinct_items() {
        let d = OverlapDetector::build(vec![
            (Interval::new("chr1", 10, 20), 1),
            (Interval::new("chr1", 10, 20), 1),
        ]);
        assert_eq!(d.query_overlaps(&Interval::new("chr1", 15, 15)).len(), 2);
        assert_eq!(d.get_all().len(), 2);
    }

    #[rstest]
    fn test_empty_detector() {
        let d: OverlapDetector<u8> = OverlapDetector::default();
        assert!(d.is_empty());
        assert!(d.get_all().is_empty());
        assert!(d.query_overlaps(&Interval::new("chr1", 1, 1)).is_empty());
    }
}
