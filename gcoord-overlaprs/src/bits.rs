use num_traits::{PrimInt, Unsigned, identities::zero};

use super::Overlapper;
use gcoord_core::models::Span;

/// A Binary Interval Search structure over closed spans.
///
/// From the journal article: <https://academic.oup.com/bioinformatics/article/29/1/1/273289>
///
/// Spans are kept sorted by start alongside separately sorted start and end positions.
/// A query binary-searches to the first span that could still reach it (its start minus
/// the longest span length) and scans forward until spans start past the query end.
///
/// # Examples
///
/// ```
/// use gcoord_overlaprs::{Bits, Overlapper, Span};
///
/// let blocks = vec![
///     Span { start: 100u32, end: 150, val: 0usize },
///     Span { start: 200, end: 250, val: 1 },
///     Span { start: 225, end: 275, val: 2 },
/// ];
///
/// let bits = Bits::build(blocks);
/// assert_eq!(bits.find(250, 260).len(), 2);
/// assert_eq!(bits.count(250, 260), 2);
/// assert_eq!(bits.count(151, 199), 0);
/// ```
#[derive(Debug, Clone)]
pub struct Bits<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    spans: Vec<Span<I, T>>,
    /// Sorted start positions
    starts: Vec<I>,
    /// Sorted end positions
    ends: Vec<I>,
    /// `end - start` of the longest span
    max_len: I,
}

impl<I, T> Overlapper<I, T> for Bits<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    fn build(mut spans: Vec<Span<I, T>>) -> Self
    where
        Self: Sized,
    {
        spans.sort();
        let (mut starts, mut ends): (Vec<_>, Vec<_>) =
            spans.iter().map(|s| (s.start, s.end)).unzip();
        starts.sort();
        ends.sort();
        let max_len = spans
            .iter()
            .map(|s| s.end.checked_sub(&s.start).unwrap_or_else(zero::<I>))
            .max()
            .unwrap_or_else(zero::<I>);
        Bits {
            spans,
            starts,
            ends,
            max_len,
        }
    }

    #[inline]
    fn find(&self, start: I, end: I) -> Vec<Span<I, T>> {
        self.find_iter(start, end).cloned().collect()
    }

    fn find_iter<'a>(&'a self, start: I, end: I) -> Box<dyn Iterator<Item = &'a Span<I, T>> + 'a> {
        Box::new(IterFind {
            inner: self,
            off: Self::lower_bound(self.reach(start), &self.spans),
            start,
            end,
        })
    }

    fn len(&self) -> usize {
        self.spans.len()
    }
}

impl<I, T> Bits<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    /// Smallest start a span could have and still reach `start`.
    #[inline]
    fn reach(&self, start: I) -> I {
        start.checked_sub(&self.max_len).unwrap_or_else(zero::<I>)
    }

    /// Iterate every span in start order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Span<I, T>> {
        self.spans.iter()
    }

    /// Index of the first span whose start is not below `start`.
    #[inline]
    pub fn lower_bound(start: I, spans: &[Span<I, T>]) -> usize {
        spans.partition_point(|s| s.start < start)
    }

    /// Insertion position of `key` in the sorted slice `elems`: the first index
    /// whose element is not below `key`.
    #[inline]
    pub fn bsearch_seq<K>(key: K, elems: &[K]) -> usize
    where
        K: PartialOrd,
    {
        elems.partition_point(|e| *e < key)
    }

    /// Count spans overlapping `[start, end]` with two binary searches and no scan.
    ///
    /// Every span either ends before `start`, starts after `end`, or overlaps; for a
    /// well-formed query (`start <= end`) the first two groups are disjoint.
    #[inline]
    pub fn count(&self, start: I, end: I) -> usize {
        let ends_before = Self::bsearch_seq(start, &self.ends);
        let starts_through = match end.checked_add(&I::one()) {
            Some(next) => Self::bsearch_seq(next, &self.starts),
            None => self.starts.len(),
        };
        starts_through.saturating_sub(ends_before)
    }

    /// Find overlaps for queries arriving in ascending start order.
    ///
    /// `cursor` remembers where the previous query began scanning and should be reused
    /// for the next query; the structure itself stays immutable and shareable.
    ///
    /// ```
    /// use gcoord_overlaprs::{Bits, Overlapper, Span};
    ///
    /// let bits = Bits::build((0u32..100).step_by(5)
    ///     .map(|x| Span { start: x, end: x + 2, val: x })
    ///     .collect::<Vec<_>>());
    /// let mut cursor = 0;
    /// for s in bits.iter() {
    ///     assert_eq!(bits.seek(s.start, s.end, &mut cursor).count(), 1);
    /// }
    /// ```
    #[inline]
    pub fn seek<'a>(&'a self, start: I, end: I, cursor: &mut usize) -> IterFind<'a, I, T> {
        let reach = self.reach(start);
        if *cursor == 0 || (*cursor < self.spans.len() && self.spans[*cursor].start > start) {
            *cursor = Self::lower_bound(reach, &self.spans);
        }

        while *cursor + 1 < self.spans.len() && self.spans[*cursor + 1].start < reach {
            *cursor += 1;
        }

        IterFind {
            inner: self,
            off: *cursor,
            start,
            end,
        }
    }
}

/// Spans of a [`Bits`] overlapping a query, produced by
/// [`find_iter`](Overlapper::find_iter) or [`seek`](Bits::seek).
#[derive(Debug)]
pub struct IterFind<'a, I, T>
where
    T: Eq + Clone + Send + Sync + 'a,
    I: PrimInt + Unsigned + Send + Sync,
{
    inner: &'a Bits<I, T>,
    off: usize,
    start: I,
    end: I,
}

impl<'a, I, T> Iterator for IterFind<'a, I, T>
where
    T: Eq + Clone + Send + Sync + 'a,
    I: PrimInt + Unsigned + Send + Sync,
{
    type Item = &'a Span<I, T>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let spans = &self.inner.spans;
        while self.off < spans.len() {
            let span = &spans[self.off];
            self.off += 1;
            if span.overlap(self.start, self.end) {
                return Some(span);
            } else if span.start > self.end {
                break;
            }
        }
        None
    }
}

impl<'a, I, T> IntoIterator for &'a Bits<I, T>
where
    T: Eq + Clone + Send + Sync + 'a,
    I: PrimInt + Unsigned + Send + Sync,
{
    type Item = &'a Span<I, T>;
    type IntoIter = std::slice::Iter<'a, Span<I, T>>;

    fn into_iter(self) -> std::slice::Iter<'a, Span<I, T>> {
        self.spans.iter()
    }
}
