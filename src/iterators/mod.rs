use crate::core::counter::Counter;
use crate::Histogram;

/// An iterator that iterates linearly over histogram values.
pub mod linear;

/// An iterator that iterates logarithmically over histogram values.
pub mod log;

/// An iterator that iterates over recorded histogram values.
pub mod recorded;

/// An iterator that iterates over histogram values.
pub mod all;

/// An iterator that iterates over quantile steps through a histogram's value range.
pub mod quantile;

/// A trait for designing a subset iterator over values in a `Histogram`.
pub trait PickyIterator<T: Counter> {
    /// Should an item be yielded for the given index? `count_at_index` is the count recorded at
    /// `index`, provided so implementations don't need their own handle back into the histogram
    /// just to look it up.
    ///
    /// Returns `Some(metadata)` to yield this index, with `metadata` describing any overrides to
    /// the value or quantile that would otherwise be derived directly from the index. Returns
    /// `None` to skip this index.
    fn pick(&mut self, index: usize, running_total: u64, count_at_index: T) -> Option<PickMetadata>;
    /// should we keep iterating even though all future indices are zeros?
    fn more(&mut self, index: usize) -> bool;
}

/// Per-yield overrides that a `PickyIterator` can attach to a pick. Iterators that report on
/// buckets wider than a single index (linear, logarithmic) use `highest_equivalent_value` to
/// report the top of the bucket instead of the value at the picked index. Iterators that ratchet
/// towards target quantiles (quantile, percentile) use `quantile_iterated_to` to report the
/// quantile boundary that was crossed rather than the actual quantile at this index.
#[derive(Debug, Clone, Copy, Default)]
pub struct PickMetadata {
    quantile_iterated_to: Option<f64>,
    highest_equivalent_value: Option<u64>,
}

impl PickMetadata {
    /// Construct new metadata for a pick.
    pub fn new(quantile_iterated_to: Option<f64>, highest_equivalent_value: Option<u64>) -> PickMetadata {
        PickMetadata {
            quantile_iterated_to,
            highest_equivalent_value,
        }
    }
}

/// A value yielded by a `HistogramIterator`.
///
/// `quantile` is the actual quantile reached at this point in the iteration (the fraction, in
/// `[0.0, 1.0]`, of recorded values at or below `value_iterated_to`). `quantile_iterated_to` is
/// the quantile boundary the iterator was stepping towards; for most iterators this is the same
/// as `quantile`, but for the quantile-stepping iterators it is the ratcheted target rather than
/// the exact value.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct IterationValue<T: Counter> {
    value_iterated_to: i64,
    quantile: f64,
    quantile_iterated_to: f64,
    count_at_value: T,
    count_since_last_iteration: u64,
}

impl<T: Counter> IterationValue<T> {
    /// Create a new `IterationValue`.
    pub fn new(
        value_iterated_to: i64,
        quantile: f64,
        quantile_iterated_to: f64,
        count_at_value: T,
        count_since_last_iteration: u64,
    ) -> IterationValue<T> {
        IterationValue {
            value_iterated_to,
            quantile,
            quantile_iterated_to,
            count_at_value,
            count_since_last_iteration,
        }
    }

    /// The highest value reachable by the bucket this iteration step stopped in.
    pub fn value_iterated_to(&self) -> i64 {
        self.value_iterated_to
    }

    /// The quantile of values at or below `value_iterated_to`.
    pub fn quantile(&self) -> f64 {
        self.quantile
    }

    /// The quantile boundary this iteration step was targeting.
    pub fn quantile_iterated_to(&self) -> f64 {
        self.quantile_iterated_to
    }

    /// The count recorded at `value_iterated_to`'s bucket.
    pub fn count_at_value(&self) -> T {
        self.count_at_value
    }

    /// The count of values seen since the previous iteration step.
    pub fn count_since_last_iteration(&self) -> u64 {
        self.count_since_last_iteration
    }
}

/// `HistogramIterator` provides a base iterator for a `Histogram`.
///
/// It will iterate over all discrete values until there are no more recorded values (i.e., *not*
/// necessarily until all bins have been exhausted). To facilitate the development of more
/// sophisticated iterators, a *picker* is also provided, which is allowed to only select some bins
/// that should be yielded. The picker may also extend the iteration to include a suffix of empty
/// bins.
///
/// One peculiarity of this iterator is that, if the picker does choose to yield a particular bin,
/// that bin *is re-visited* before moving on to later bins. It is not clear why this is, but it is
/// how the iterators were implemented in the original HdrHistogram, so we preserve the behavior
/// here. This is the reason why iterators such as all and recorded need to keep track of which
/// indices they have already visited.
pub struct HistogramIterator<'a, T: 'a + Counter, P: PickyIterator<T>> {
    hist: &'a Histogram<T>,
    total_count_to_index: u64,
    prev_total_count: u64,
    current_index: usize,
    fresh: bool,
    ended: bool,
    picker: P,
}

impl<'a, T: Counter, P: PickyIterator<T>> HistogramIterator<'a, T, P> {
    fn new(h: &'a Histogram<T>, picker: P) -> HistogramIterator<'a, T, P> {
        HistogramIterator {
            hist: h,
            total_count_to_index: 0,
            prev_total_count: 0,
            current_index: 0,
            picker,
            fresh: true,
            ended: false,
        }
    }

    fn current(&self, metadata: PickMetadata) -> IterationValue<T> {
        let highest_equivalent_value = metadata.highest_equivalent_value.unwrap_or_else(|| {
            self.hist
                .highest_equivalent(self.hist.value_for(self.current_index))
        });
        let count_at_value = self
            .hist
            .count_at_index(self.current_index)
            .expect("current_index must be valid by PickyIterator contract");
        let quantile = self.total_count_to_index as f64 / self.hist.len() as f64;
        let quantile_iterated_to = metadata.quantile_iterated_to.unwrap_or(quantile);

        IterationValue::new(
            highest_equivalent_value as i64,
            quantile,
            quantile_iterated_to,
            count_at_value,
            self.total_count_to_index - self.prev_total_count,
        )
    }
}

impl<'a, T: 'a, P> Iterator for HistogramIterator<'a, T, P>
where
    T: Counter,
    P: PickyIterator<T>,
{
    type Item = IterationValue<T>;
    fn next(&mut self) -> Option<Self::Item> {
        // here's the deal: we are iterating over all the indices in the histogram's .count array.
        // however, most of those values (especially towards the end) will be zeros, which the
        // original HdrHistogram implementation doesn't yield (probably with good reason -- there
        // could be a lot of them!). so, what we do instead is iterate over indicies until we reach
        // the total *count*. After that, we iterate only until .more() returns false, at which
        // point we stop completely.

        // rust doesn't support tail call optimization, so we'd run out of stack if we simply
        // called self.next() again at the bottom. instead, we loop when we would have yielded None
        // unless we have ended.
        while !self.ended {
            // have we reached the end?
            if self.current_index == self.hist.distinct_values() {
                self.ended = true;
                return None;
            }

            // have we yielded all non-zeros in the histogram?
            let total = self.hist.len();
            if self.prev_total_count == total {
                // is the picker done?
                if !self.picker.more(self.current_index) {
                    self.ended = true;
                    return None;
                }

                // nope -- alright, let's keep iterating
            } else {
                debug_assert!(self.current_index < self.hist.distinct_values());
                debug_assert!(self.prev_total_count < total);

                if self.fresh {
                    let count = self
                        .hist
                        .count_at_index(self.current_index)
                        .expect("current_index must be valid by PickyIterator contract");

                    // if we've seen all counts, no other counts should be non-zero
                    if self.total_count_to_index == total {
                        debug_assert!(count == T::zero());
                    }

                    // maintain total count so we can yield quantiles
                    self.total_count_to_index += count.as_u64();

                    // make sure we don't add this index again
                    self.fresh = false;
                }
            }

            let count_at_index = self
                .hist
                .count_at_index(self.current_index)
                .expect("current_index must be valid by PickyIterator contract");

            // figure out if picker thinks we should yield this value
            if let Some(metadata) = self
                .picker
                .pick(self.current_index, self.total_count_to_index, count_at_index)
            {
                let val = self.current(metadata);

                // note that we *don't* increment self.current_index here. the picker will be
                // exposed to the same value again after yielding. not sure why this is the
                // behavior we want, but it's what the original Java implementation dictates.

                self.prev_total_count = self.total_count_to_index;
                return Some(val);
            }

            // check the next entry
            self.current_index += 1;
            self.fresh = true;
        }
        None
    }
}
