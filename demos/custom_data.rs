//! An example showcasing the median tracker on a custom data type
//!
//! Types without an average can still report their middle value(s) through `median_pair`

use abundancy_median::MedianTracker;

/// Our custom data type: a classification enum
///
/// Note that only [`Ord`] is necessary here
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Class {
    Low,
    Medium,
    High,
    VeryHigh,
}

/// Some sample data to calculate the median for
///
/// Note that the exact median is [`Class::Medium`]
const DATA: [Class; 15] = [
    Class::Medium,
    Class::Low,
    Class::High,
    Class::Medium,
    Class::Low,
    Class::Medium,
    Class::VeryHigh,
    Class::Medium,
    Class::High,
    Class::Low,
    Class::Medium,
    Class::VeryHigh,
    Class::High,
    Class::High,
    Class::Low,
];

fn main() {
    let mut tracker = MedianTracker::new();

    for data_point in DATA {
        tracker.insert(data_point);
    }

    // An odd number of points, so there is a single middle value
    match tracker.median_pair() {
        Some((middle, None)) => println!("Median: {middle:?}"),
        Some((low, Some(high))) => println!("Median is between {low:?} and {high:?}"),
        None => println!("No data"),
    }
}
