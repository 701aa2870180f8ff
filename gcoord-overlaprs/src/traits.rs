use num_traits::{PrimInt, Unsigned};

pub use gcoord_core::models::Span;

/// A single-sequence structure answering "which spans overlap `[start, end]`".
///
/// Both query bounds are inclusive.
pub trait Overlapper<I, T>: Send + Sync
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    fn build(spans: Vec<Span<I, T>>) -> Self
    where
        Self: Sized;

    fn find(&self, start: I, end: I) -> Vec<Span<I, T>>;

    fn find_iter<'a>(&'a self, start: I, end: I) -> Box<dyn Iterator<Item = &'a Span<I, T>> + 'a>;

    /// Number of stored spans.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
