//! Set algebra over [`NamedIntervalList`]s.
//!
//! Every operation taking several lists first checks that they share one sequence
//! dictionary. Outputs other than [`concatenate`](NamedIntervalList::concatenate) are
//! sorted by sequence name, start and end.
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use log::warn;

use gcoord_core::models::{Locatable, NamedInterval, SequenceDictionary};

use crate::errors::{IntervalListError, IntervalListResult};
use crate::list::{NamedIntervalList, coalesce};

/// The dictionary every list agrees on.
fn shared_dictionary(lists: &[&NamedIntervalList]) -> IntervalListResult<Arc<SequenceDictionary>> {
    let first = lists.first().ok_or(IntervalListError::NoInput)?;
    for other in &lists[1..] {
        if let Err(e) = first.dictionary().assert_same_dictionary(other.dictionary()) {
            warn!("Refusing to combine interval lists: {e}");
            return Err(e.into());
        }
    }
    Ok(first.dictionary().clone())
}

/// Group sorted intervals by sequence, keeping their order.
fn by_sequence(intervals: &[NamedInterval]) -> HashMap<&str, Vec<&NamedInterval>> {
    let mut grouped: HashMap<&str, Vec<&NamedInterval>> = HashMap::new();
    for iv in intervals {
        grouped.entry(iv.sequence()).or_default().push(iv);
    }
    grouped
}

/// Intersect two sorted lists of disjoint intervals with a single merge scan.
fn intersect_sorted(a: &[NamedInterval], b: &[NamedInterval]) -> Vec<NamedInterval> {
    let mut out = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        let (x, y) = (&a[i], &b[j]);
        match x.sequence().cmp(y.sequence()) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                if x.intersects(y) {
                    out.push(NamedInterval::new(
                        x.sequence(),
                        x.start().max(y.start()),
                        x.end().min(y.end()),
                    ));
                }
                // the side ending first cannot reach anything further on the other side
                if x.end() <= y.end() {
                    i += 1;
                } else {
                    j += 1;
                }
            }
        }
    }
    out
}

impl NamedIntervalList {
    /// Every interval of every list, in list order.
    pub fn concatenate(lists: &[&NamedIntervalList]) -> IntervalListResult<Self> {
        let dictionary = shared_dictionary(lists)?;
        let intervals = lists
            .iter()
            .flat_map(|l| l.intervals().iter().cloned())
            .collect();
        Ok(Self::from_parts(dictionary, intervals))
    }

    /// Everything covered by at least one list, with overlapping and abutting intervals merged.
    pub fn union(lists: &[&NamedIntervalList]) -> IntervalListResult<Self> {
        Ok(Self::concatenate(lists)?.uniqued(true))
    }

    /// Bases covered by every list.
    pub fn intersection(lists: &[&NamedIntervalList]) -> IntervalListResult<Self> {
        let dictionary = shared_dictionary(lists)?;

        let mut unioned = lists.iter().map(|l| l.uniqued(false));
        let mut acc: Vec<NamedInterval> = match unioned.next() {
            Some(first) => first.intervals().to_vec(),
            None => return Err(IntervalListError::NoInput),
        };
        for next in unioned {
            acc = intersect_sorted(&acc, next.intervals());
        }

        Ok(Self::from_parts(dictionary, coalesce(&acc, false)))
    }

    ///
    /// Bases covered by `from` but by none of `what`. Each interval of the union of
    /// `from` is cut into the pieces that remain, keeping its name and strand.
    ///
    pub fn subtract(
        from: &[&NamedIntervalList],
        what: &[&NamedIntervalList],
    ) -> IntervalListResult<Self> {
        let all: Vec<&NamedIntervalList> = from.iter().chain(what.iter()).copied().collect();
        let dictionary = shared_dictionary(&all)?;

        let kept = Self::union(from)?;
        let removed = if what.is_empty() {
            Self::new(dictionary.clone())
        } else {
            Self::union(what)?
        };
        let removed_by_seq = by_sequence(removed.intervals());

        let no_removals = Vec::new();
        let mut out = Vec::new();
        let mut cursor: HashMap<&str, usize> = HashMap::new();

        for iv in kept.intervals() {
            let removals = removed_by_seq.get(iv.sequence()).unwrap_or(&no_removals);
            let idx = cursor.entry(iv.sequence()).or_insert(0);

            // skip removals ending before this interval
            while *idx < removals.len() && removals[*idx].end() < iv.start() {
                *idx += 1;
            }

            // u64 so the position after a removal ending at u32::MAX still fits
            let mut pos = iv.start() as u64;
            let mut j = *idx;
            while j < removals.len() && removals[j].start() <= iv.end() && pos <= iv.end() as u64 {
                let r = removals[j];
                if r.start() as u64 > pos {
                    out.push(piece(iv, pos as u32, r.start() - 1));
                }
                pos = pos.max(r.end() as u64 + 1);
                j += 1;
            }

            if pos <= iv.end() as u64 {
                out.push(piece(iv, pos as u32, iv.end()));
            }
        }

        Ok(Self::from_parts(dictionary, out))
    }

    ///
    /// Every base of the dictionary not covered by this list. Sequences without intervals
    /// come back whole; fully covered sequences contribute nothing.
    ///
    pub fn invert(&self) -> Self {
        let unioned = self.uniqued(false);
        let covered = by_sequence(unioned.intervals());

        let mut out = Vec::new();
        for record in self.dictionary().iter() {
            let length = record.length as u64;
            let mut pos = 1u64;

            for iv in covered.get(record.name.as_str()).into_iter().flatten() {
                let gap_end = (iv.start() as u64).saturating_sub(1).min(length);
                if gap_end >= pos {
                    out.push(NamedInterval::new(record.name.as_str(), pos as u32, gap_end as u32));
                }
                pos = pos.max(iv.end() as u64 + 1);
            }

            if pos <= length {
                out.push(NamedInterval::new(record.name.as_str(), pos as u32, length as u32));
            }
        }

        out.sort();
        Self::from_parts(self.dictionary().clone(), out)
    }
}

/// `[start, end]` carrying the name and strand of `source`.
fn piece(source: &NamedInterval, start: u32, end: u32) -> NamedInterval {
    NamedInterval::with_meta(
        source.sequence(),
        start,
        end,
        source.is_negative_strand(),
        source.name().map(str::to_string),
    )
}
