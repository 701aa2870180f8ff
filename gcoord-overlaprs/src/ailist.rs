use std::mem::swap;

use num_traits::{PrimInt, Unsigned};

use super::Overlapper;
use gcoord_core::models::Span;

/// Sub-lists whose spans cover at least this many later neighbours are pulled out
/// into their own component during decomposition.
const MIN_COVERAGE_LEN: usize = 10;

/// An Augmented Interval List over closed spans.
///
/// From the following article: <https://academic.oup.com/bioinformatics/article/35/23/4907/5509521>
///
/// The list is decomposed into components so that long spans covering many short ones
/// do not force a linear scan; each component keeps a running maximum of span ends
/// that lets a query stop as soon as nothing further to the left can reach it.
///
/// # Examples
///
/// ```
/// use gcoord_overlaprs::{AIList, Overlapper, Span};
///
/// let chains = vec![
///     Span { start: 1000u32, end: 2000, val: 1usize },
///     Span { start: 1500, end: 2500, val: 2 },
///     Span { start: 5000, end: 6000, val: 3 },
/// ];
///
/// let ailist = AIList::build(chains);
/// assert_eq!(ailist.find(2000, 2200).len(), 2);
/// assert_eq!(ailist.find(2001, 2200).len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct AIList<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    starts: Vec<I>,
    ends: Vec<I>,
    max_ends: Vec<I>,
    /// Offset of the first element of every component.
    header_list: Vec<usize>,
    stored_spans: Vec<Span<I, T>>,
}

/// Scratch storage for one round of [`AIList::decompose`].
#[derive(Debug, Default)]
struct DecomposeResult<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    starts: Vec<I>,
    ends: Vec<I>,
    max_ends: Vec<I>,
    stored_spans: Vec<Span<I, T>>,
    /// Spans deferred to the next component.
    deferred: Vec<Span<I, T>>,
}

impl<I, T> DecomposeResult<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    fn with_capacity(cap: usize) -> Self {
        Self {
            starts: Vec::with_capacity(cap),
            ends: Vec::with_capacity(cap),
            max_ends: Vec::with_capacity(cap),
            stored_spans: Vec::with_capacity(cap),
            deferred: Vec::with_capacity(cap),
        }
    }

    fn clear(&mut self) {
        self.starts.clear();
        self.ends.clear();
        self.max_ends.clear();
        self.stored_spans.clear();
        self.deferred.clear();
    }
}

impl<I, T> Overlapper<I, T> for AIList<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    fn build(spans: Vec<Span<I, T>>) -> Self
    where
        Self: Sized,
    {
        let mut spans = spans;
        spans.sort_by_key(|s| s.start);

        let mut starts = Vec::with_capacity(spans.len());
        let mut ends = Vec::with_capacity(spans.len());
        let mut max_ends = Vec::with_capacity(spans.len());
        let mut stored_spans = Vec::with_capacity(spans.len());

        // the scratch buffers are drained every round but keep their capacity
        let mut scratch = DecomposeResult::with_capacity(spans.len());
        let mut header_list = vec![0];

        loop {
            Self::decompose(&spans, MIN_COVERAGE_LEN, &mut scratch);

            starts.append(&mut scratch.starts);
            ends.append(&mut scratch.ends);
            max_ends.append(&mut scratch.max_ends);
            stored_spans.append(&mut scratch.stored_spans);
            swap(&mut spans, &mut scratch.deferred);

            if spans.is_empty() {
                break;
            }
            header_list.push(starts.len());
        }

        AIList {
            starts,
            ends,
            max_ends,
            header_list,
            stored_spans,
        }
    }

    fn find(&self, start: I, end: I) -> Vec<Span<I, T>> {
        self.find_iter(start, end).cloned().collect()
    }

    fn find_iter<'a>(&'a self, start: I, end: I) -> Box<dyn Iterator<Item = &'a Span<I, T>> + 'a> {
        Box::new(IterFind {
            inner: self,
            component: 0,
            cursor: None,
            start,
            end,
        })
    }

    fn len(&self) -> usize {
        self.stored_spans.len()
    }
}

impl<I, T> AIList<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    fn decompose(spans: &[Span<I, T>], min_coverage: usize, scratch: &mut DecomposeResult<I, T>) {
        scratch.clear();

        for (index, span) in spans.iter().enumerate() {
            let covered = spans
                .iter()
                .skip(index + 1)
                .take(min_coverage * 2 - 1)
                .filter(|other| span.end > other.end)
                .count();

            if covered >= min_coverage {
                scratch.deferred.push(span.clone());
            } else {
                scratch.starts.push(span.start);
                scratch.ends.push(span.end);
                scratch.stored_spans.push(span.clone());
            }
        }

        let mut max = I::zero();
        for end in scratch.ends.iter() {
            max = max.max(*end);
            scratch.max_ends.push(max);
        }
    }

    /// Element range of component `idx`.
    fn component(&self, idx: usize) -> std::ops::Range<usize> {
        let lo = self.header_list[idx];
        let hi = self
            .header_list
            .get(idx + 1)
            .copied()
            .unwrap_or(self.starts.len());
        lo..hi
    }

    /// Number of decomposed components.
    pub fn components(&self) -> usize {
        self.header_list.len()
    }
}

/// Lazily walks every component of an [`AIList`] right to left from the last span
/// starting at or before the query end.
#[derive(Debug)]
pub struct IterFind<'a, I, T>
where
    T: Eq + Clone + Send + Sync + 'a,
    I: PrimInt + Unsigned + Send + Sync,
{
    inner: &'a AIList<I, T>,
    component: usize,
    cursor: Option<usize>,
    start: I,
    end: I,
}

impl<'a, I, T> Iterator for IterFind<'a, I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync + 'a,
{
    type Item = &'a Span<I, T>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.component < self.inner.header_list.len() {
            let inner = self.inner;
            let range = inner.component(self.component);
            let starts = &inner.starts[range.clone()];
            let ends = &inner.ends[range.clone()];
            let max_ends = &inner.max_ends[range.clone()];
            let spans = &inner.stored_spans[range];

            let end = self.end;
            let i = self
                .cursor
                .get_or_insert_with(|| starts.partition_point(|&x| x <= end));

            while *i > 0 {
                *i -= 1;
                if self.start > ends[*i] {
                    // nothing further left can reach the query
                    if self.start > max_ends[*i] {
                        break;
                    }
                } else {
                    return Some(&spans[*i]);
                }
            }
            self.cursor = None;
            self.component += 1;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::{assert_eq, assert_ne};
    use rstest::{fixture, rstest};

    #[fixture]
    fn spans() -> Vec<Span<u32, &'static str>> {
        vec![
            Span { start: 1, end: 5, val: "a" },
            Span { start: 3, end: 7, val: "b" },
            Span { start: 6, end: 10, val: "c" },
            Span { start: 8, end: 12, val: "d" },
        ]
    }

    fn vals<'a>(found: impl Iterator<Item = &'a Span<u32, &'static str>>) -> Vec<&'static str> {
        let mut v: Vec<&str> = found.map(|s| s.val).collect();
        v.sort();
        v
    }

    #[rstest]
    fn test_build_and_len(spans: Vec<Span<u32, &'static str>>) {
        let ailist = AIList::build(spans.clone());
        assert_eq!(ailist.len(), spans.len());
        assert_ne!(ailist.is_empty(), true);
    }

    #[rstest]
    #[case(2, 4, vec!["a", "b"])]
    #[case(9, 11, vec!["c", "d"])]
    #[case(5, 5, vec!["a", "b"])]
    #[case(12, 12, vec!["d"])]
    #[case(13, 15, vec![])]
    #[case(0, 0, vec![])]
    fn test_find_closed_bounds(
        spans: Vec<Span<u32, &'static str>>,
        #[case] start: u32,
        #[case] end: u32,
        #[case] expected: Vec<&'static str>,
    ) {
        let ailist = AIList::build(spans);
        assert_eq!(vals(ailist.find_iter(start, end)), expected);
        assert_eq!(ailist.find(start, end).len(), expected.len());
    }

    #[rstest]
    fn test_empty_ailist() {
        let ailist: AIList<u32, &str> = AIList::build(vec![]);
        assert_eq!(ailist.len(), 0);
        assert!(ailist.is_empty());
        assert!(ailist.find(1, 2).is_empty());
    }

    #[rstest]
    fn test_decomposed_components_are_all_searched() {
        let iv = |start: u32, end: u32| Span { start, end, val: (start, end) };
        let mut spans = vec![iv(1, 1000)];
        spans.extend((0..40).map(|i| iv(10 + i * 20, 15 + i * 20)));
        spans.push(iv(500, 2000));

        let ailist = AIList::build(spans.clone());
        assert!(ailist.components() >= 2);

        for (start, end) in [(1, 1), (12, 12), (16, 29), (505, 505), (1500, 1600), (2001, 3000)] {
            let mut expected: Vec<(u32, u32)> = spans
                .iter()
                .filter(|s| s.overlap(start, end))
                .map(|s| s.val)
                .collect();
            let mut found: Vec<(u32, u32)> = ailist.find_iter(start, end).map(|s| s.val).collect();
            expected.sort();
            found.sort();
            assert_eq!(found, expected, "query {start}-{end}");
        }
    }
}
