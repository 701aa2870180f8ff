use num_traits::{PrimInt, Unsigned, identities::zero};
use std::cmp::Ordering::{self};

/// A closed range `[start, end]` carrying a value, the element stored by the
/// overlap structures. Both ends are inclusive.
#[derive(Eq, Debug, Clone)]
pub struct Span<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    pub start: I,
    pub end: I,
    pub val: T,
}

impl<I, T> Ord for Span<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    #[inline]
    fn cmp(&self, other: &Span<I, T>) -> Ordering {
        match self.start.cmp(&other.start) {
            Ordering::Equal => self.end.cmp(&other.end),
            ord => ord,
        }
    }
}

impl<I, T> Span<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    /// Number of positions shared with `other`
    #[inline]
    pub fn intersect(&self, other: &Span<I, T>) -> I {
        let lo = std::cmp::max(self.start, other.start);
        let hi = std::cmp::min(self.end, other.end);
        if hi < lo {
            zero::<I>()
        } else {
            hi - lo + I::one()
        }
    }

    /// Check if this span shares at least one position with `[start, end]`
    #[inline]
    pub fn overlap(&self, start: I, end: I) -> bool {
        self.start <= end && start <= self.end
    }
}

impl<I, T> PartialOrd for Span<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<I, T> PartialEq for Span<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    #[inline]
    fn eq(&self, other: &Span<I, T>) -> bool {
        self.start == other.start && self.end == other.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 5, 5, 9, 1)]
    #[case(1, 5, 6, 9, 0)]
    #[case(3, 8, 1, 10, 6)]
    fn test_intersect(
        #[case] a_start: u32,
        #[case] a_end: u32,
        #[case] b_start: u32,
        #[case] b_end: u32,
        #[case] expected: u32,
    ) {
        let a = Span { start: a_start, end: a_end, val: () };
        let b = Span { start: b_start, end: b_end, val: () };
        assert_eq!(a.intersect(&b), expected);
        assert_eq!(a.overlap(b_start, b_end), expected > 0);
    }
}
