use crate::core::counter::Counter;
use crate::iterators::{HistogramIterator, PickMetadata, PickyIterator};
use crate::Histogram;

/// An iterator that will yield only bins with at least one sample.
pub struct Iter<'a, T: 'a + Counter> {
    hist: &'a Histogram<T>,
    visited: Option<usize>,
}

impl<'a, T: 'a + Counter> Iter<'a, T> {
    /// Construct a new sampled iterator. See `Histogram::iter_recorded` for details.
    pub fn new(hist: &'a Histogram<T>) -> HistogramIterator<'a, T, Iter<'a, T>> {
        HistogramIterator::new(hist, Iter { hist, visited: None })
    }
}

impl<'a, T: 'a + Counter> PickyIterator<T> for Iter<'a, T> {
    fn pick(&mut self, index: usize, _: u64, _: T) -> Option<PickMetadata> {
        // is the count non-zero?
        let count = self
            .hist
            .count_at_index(index)
            .expect("index must be valid by PickyIterator contract");
        if count != T::zero() && self.visited != Some(index) {
            self.visited = Some(index);
            return Some(PickMetadata::new(None, None));
        }
        None
    }

    fn more(&mut self, _: usize) -> bool {
        false
    }
}
