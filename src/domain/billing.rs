//! Prorates subscription prices against a summary window.
//!
//! Every subscription bills its full price once per calendar month it is active. A query
//! window may cover only part of a subscription's lifetime, so each subscription is billed
//! for the months where its lifetime and the window intersect.

use std::cmp::Ordering;

use crate::domain::month_date::MonthDate;
use crate::domain::subscription::Subscription;
use crate::domain::summary_query::SummaryQuery;

/// Raised when a cost or a total no longer fits in an `i64`.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("The subscription costs exceed the representable total.")]
pub struct CostOverflow;

/// The part of a subscription needed to bill it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillingRecord {
    pub price: i64,
    pub start_date: MonthDate,
    pub end_date: MonthDate,
}

/// Intersection of a subscription lifetime with a query window. Never empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BilledWindow {
    pub start: MonthDate,
    pub end: MonthDate,
    pub months: i64,
}

impl From<&Subscription> for BillingRecord {
    fn from(subscription: &Subscription) -> Self {
        BillingRecord {
            price: subscription.price,
            start_date: subscription.start_date,
            end_date: subscription.end_date,
        }
    }
}

impl BillingRecord {
    /// Clips the record lifetime to the query window. An open end date runs until the end
    /// of the window. Returns `None` when nothing of the lifetime falls inside the window.
    pub fn billed_window(&self, query: &SummaryQuery) -> Option<BilledWindow> {
        let start = match self.start_date.try_cmp(&query.start_date())? {
            Ordering::Greater => self.start_date,
            _ => query.start_date(),
        };

        let end = if self.end_date.is_unset() {
            query.end_date()
        } else {
            match self.end_date.try_cmp(&query.end_date())? {
                Ordering::Less => self.end_date,
                _ => query.end_date(),
            }
        };

        let months = start.months_between(&end)?;

        Some(BilledWindow { start, end, months })
    }

    pub fn cost(&self, query: &SummaryQuery) -> Result<i64, CostOverflow> {
        match self.billed_window(query) {
            Some(window) => self.price.checked_mul(window.months).ok_or(CostOverflow),
            None => Ok(0),
        }
    }
}

/// Sums the cost of every record over the query window.
///
/// Records are expected to be pre-selected by the storage layer, but a record that does not
/// overlap the window still contributes nothing.
pub fn total_cost<I>(query: &SummaryQuery, records: I) -> Result<i64, CostOverflow>
where
    I: IntoIterator<Item = BillingRecord>,
{
    records.into_iter().try_fold(0_i64, |total, record| {
        total.checked_add(record.cost(query)?).ok_or(CostOverflow)
    })
}
