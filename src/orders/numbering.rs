//! Order Numbering
//!
//! Human-readable order numbers of the form `ORD-YYYYMMDD-NNN`. The counter
//! restarts at 001 each day and follows the highest number already stored
//! for that day.

use chrono::NaiveDate;

use crate::db::repository::{OrderRepository, RepoResult};

#[derive(Clone)]
pub struct OrderNumbering {
    orders: OrderRepository,
}

impl OrderNumbering {
    pub fn new(orders: OrderRepository) -> Self {
        Self { orders }
    }

    /// Allocate the next order number for the given day.
    ///
    /// Callers must serialize allocation with order insertion; the unique
    /// index on `orderNumber` rejects the write if two allocations ever race.
    pub async fn allocate(&self, date: NaiveDate) -> RepoResult<String> {
        let prefix = day_prefix(date);
        let numbers = self.orders.find_numbers_for_prefix(&prefix).await?;
        let counter = next_counter(&numbers);
        Ok(format!("{}{:03}", prefix, counter))
    }
}

/// Prefix shared by every order placed on `date`
fn day_prefix(date: NaiveDate) -> String {
    format!("ORD-{}-", date.format("%Y%m%d"))
}

/// Counter following the highest numeric suffix, or 1 when the day has no
/// orders yet. Compared numerically: past 999 orders the zero padding
/// overflows and string ordering would stick at 999.
fn next_counter(numbers: &[String]) -> u32 {
    numbers
        .iter()
        .filter_map(|number| number.rsplit('-').next())
        .filter_map(|suffix| suffix.parse::<u32>().ok())
        .max()
        .map(|counter| counter + 1)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_formats_date_compactly() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(day_prefix(date), "ORD-20250307-");
    }

    fn numbers(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn counter_starts_at_one() {
        assert_eq!(next_counter(&[]), 1);
    }

    #[test]
    fn counter_follows_highest_number() {
        assert_eq!(next_counter(&numbers(&["ORD-20250307-001"])), 2);
        assert_eq!(
            next_counter(&numbers(&["ORD-20250307-001", "ORD-20250307-042"])),
            43
        );
    }

    #[test]
    fn counter_keeps_counting_past_the_zero_padding() {
        // "999" sorts after "1000" as a string; the numeric compare must win
        assert_eq!(
            next_counter(&numbers(&["ORD-20250307-999", "ORD-20250307-1000"])),
            1001
        );
        assert_eq!(next_counter(&numbers(&["ORD-20250307-999"])), 1000);
    }

    #[test]
    fn counter_recovers_from_malformed_numbers() {
        assert_eq!(next_counter(&numbers(&["garbage"])), 1);
        assert_eq!(
            next_counter(&numbers(&["ORD-20250307-xyz", "ORD-20250307-002"])),
            3
        );
    }
}
