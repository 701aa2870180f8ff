use std::collections::HashSet;
use std::sync::Arc;

use gcoord_core::errors::DictionaryError;
use gcoord_core::models::{Locatable, NamedInterval, SequenceDictionary};

use crate::errors::{IntervalListError, IntervalListResult};

/// Separator between member names when a merge concatenates them.
pub const NAME_SEPARATOR: &str = "|";

///
/// An ordered collection of [`NamedInterval`]s over one [`SequenceDictionary`].
///
/// Every interval lies on a sequence of the dictionary. Lists produced from other
/// lists share the same dictionary.
///
#[derive(Debug, Clone, PartialEq)]
pub struct NamedIntervalList {
    dictionary: Arc<SequenceDictionary>,
    intervals: Vec<NamedInterval>,
}

impl NamedIntervalList {
    pub fn new(dictionary: Arc<SequenceDictionary>) -> Self {
        NamedIntervalList {
            dictionary,
            intervals: Vec::new(),
        }
    }

    /// A list holding `intervals` as given. Callers guarantee the sequences are known.
    pub(crate) fn from_parts(dictionary: Arc<SequenceDictionary>, intervals: Vec<NamedInterval>) -> Self {
        NamedIntervalList {
            dictionary,
            intervals,
        }
    }

    /// A list with one interval covering the whole of `sequence`.
    pub fn from_name(dictionary: Arc<SequenceDictionary>, sequence: &str) -> IntervalListResult<Self> {
        let length = dictionary
            .sequence_length(sequence)
            .ok_or_else(|| DictionaryError::UnknownSequence(sequence.to_string()))?;
        let mut list = Self::new(dictionary);
        list.add(NamedInterval::new(sequence, 1, length))?;
        Ok(list)
    }

    /// Append an interval, rejecting sequences missing from the dictionary.
    pub fn add(&mut self, interval: NamedInterval) -> IntervalListResult<()> {
        if !self.dictionary.contains(interval.sequence()) {
            return Err(DictionaryError::UnknownSequence(interval.sequence().to_string()).into());
        }
        self.intervals.push(interval);
        Ok(())
    }

    pub fn add_all<I>(&mut self, intervals: I) -> IntervalListResult<()>
    where
        I: IntoIterator<Item = NamedInterval>,
    {
        for interval in intervals {
            self.add(interval)?;
        }
        Ok(())
    }

    pub fn dictionary(&self) -> &Arc<SequenceDictionary> {
        &self.dictionary
    }

    pub fn intervals(&self) -> &[NamedInterval] {
        &self.intervals
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NamedInterval> {
        self.intervals.iter()
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// A copy sorted by sequence name, start and end.
    pub fn sorted(&self) -> Self {
        let mut intervals = self.intervals.clone();
        intervals.sort();
        Self::from_parts(self.dictionary.clone(), intervals)
    }

    /// A sorted copy in which overlapping or abutting intervals are merged.
    pub fn uniqued(&self, concatenate_names: bool) -> Self {
        let mut intervals = self.intervals.clone();
        intervals.sort();
        Self::from_parts(self.dictionary.clone(), coalesce(&intervals, concatenate_names))
    }

    /// Total length of all intervals, counting shared bases once per interval.
    pub fn base_count(&self) -> u64 {
        self.intervals.iter().map(|iv| iv.length() as u64).sum()
    }

    /// Number of distinct bases covered.
    pub fn unique_base_count(&self) -> u64 {
        self.uniqued(false).base_count()
    }

    ///
    /// Merge a run of intervals on one sequence into a single interval spanning all of them.
    ///
    /// With `concatenate_names` the result is named by the distinct member names joined with
    /// `|` in the order they appear; otherwise it keeps a name only when every member
    /// carries that same name. The strand is kept when all members agree, else forward.
    ///
    pub fn merge(run: &[NamedInterval], concatenate_names: bool) -> IntervalListResult<NamedInterval> {
        let first = run.first().ok_or(IntervalListError::EmptyMerge)?;
        let sequence = first.sequence();

        if let Some(other) = run.iter().find(|iv| iv.sequence() != sequence) {
            return Err(IntervalListError::MixedSequences(format!(
                "{} and {}",
                sequence,
                other.sequence()
            )));
        }

        let start = run.iter().map(|iv| iv.start()).min().unwrap_or(first.start());
        let end = run.iter().map(|iv| iv.end()).max().unwrap_or(first.end());

        let name = if concatenate_names {
            let mut seen = HashSet::new();
            let names: Vec<&str> = run
                .iter()
                .filter_map(|iv| iv.name())
                .filter(|n| seen.insert(*n))
                .collect();
            (!names.is_empty()).then(|| names.join(NAME_SEPARATOR))
        } else {
            first
                .name()
                .filter(|n| run.iter().all(|iv| iv.name() == Some(*n)))
                .map(str::to_string)
        };

        let negative_strand = run.iter().all(NamedInterval::is_negative_strand);

        Ok(NamedInterval::with_meta(sequence, start, end, negative_strand, name))
    }
}

/// Merge runs of overlapping or abutting intervals of a sorted slice.
pub(crate) fn coalesce(sorted: &[NamedInterval], concatenate_names: bool) -> Vec<NamedInterval> {
    let mut out = Vec::new();
    let Some(first) = sorted.first() else {
        return out;
    };

    let mut run_start = 0;
    let mut run_end = first.end();
    for (i, iv) in sorted.iter().enumerate().skip(1) {
        if iv.sequence() == sorted[run_start].sequence() && iv.start() <= run_end.saturating_add(1) {
            run_end = run_end.max(iv.end());
        } else {
            // a run is never empty and never spans two sequences
            out.extend(NamedIntervalList::merge(&sorted[run_start..i], concatenate_names).ok());
            run_start = i;
            run_end = iv.end();
        }
    }
    out.extend(NamedIntervalList::merge(&sorted[run_start..], concatenate_names).ok());
    out
}

impl<'a> IntoIterator for &'a NamedIntervalList {
    type Item = &'a NamedInterval;
    type IntoIter = std::slice::Iter<'a, NamedInterval>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}
