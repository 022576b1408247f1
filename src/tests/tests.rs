use super::Histogram;
use crate::CreationError;

#[path = "helpers.rs"]
mod helpers;
#[path = "init.rs"]
mod init;
#[path = "value_calculation.rs"]
mod value_calculation;
#[path = "subtract.rs"]
mod subtract;

#[test]
fn new_err_high_not_double_low() {
    let res = Histogram::<u64>::new_with_bounds(10, 15, 0);
    assert_eq!(CreationError::HighLessThanTwiceLow, res.unwrap_err());
}

#[test]
fn memory_size_grows_with_counts_len() {
    let small = Histogram::<u64>::new_with_bounds(1, 2, 0).unwrap();
    let large = Histogram::<u64>::new_with_bounds(1, u64::max_value(), 3).unwrap();

    assert!(large.memory_size() > small.memory_size());
    assert_eq!(
        small.memory_size(),
        std::mem::size_of::<Histogram<u64>>() + small.distinct_values() * std::mem::size_of::<u64>()
    );
}
