use serde::Deserialize;
use std::cmp::Ordering;
use uuid::Uuid;

use crate::domain::month_date::MonthDate;
use crate::domain::subscription::{Subscription, ValidationError};

/// A spending query over a window of calendar months, optionally narrowed to one service
/// and/or one user. Both bounds are set and `start_date <= end_date`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryQuery {
    service_name: Option<String>,
    user_id: Option<Uuid>,
    start_date: MonthDate,
    end_date: MonthDate,
}

#[derive(Deserialize, Debug)]
pub struct SummaryBody {
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub start_date: MonthDate,
    #[serde(default)]
    pub end_date: MonthDate,
}

impl SummaryQuery {
    pub fn new(
        start_date: MonthDate,
        end_date: MonthDate,
        service_name: Option<String>,
        user_id: Option<Uuid>,
    ) -> Result<SummaryQuery, ValidationError> {
        match start_date.try_cmp(&end_date) {
            None => return Err(ValidationError::DatesRequired),
            Some(Ordering::Greater) => return Err(ValidationError::EndBeforeStart),
            Some(_) => {}
        }

        Ok(SummaryQuery {
            service_name: service_name.filter(|name| !name.is_empty()),
            user_id: user_id.filter(|id| !id.is_nil()),
            start_date,
            end_date,
        })
    }

    pub fn service_name(&self) -> Option<&str> {
        self.service_name.as_deref()
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.user_id
    }

    pub fn start_date(&self) -> MonthDate {
        self.start_date
    }

    pub fn end_date(&self) -> MonthDate {
        self.end_date
    }

    /// Whether the subscription is active at some point of the window and passes the
    /// optional service and user filters.
    pub fn selects(&self, subscription: &Subscription) -> bool {
        let starts_before_window_ends = matches!(
            subscription.start_date.try_cmp(&self.end_date),
            Some(Ordering::Less | Ordering::Equal)
        );
        let ends_after_window_starts = subscription.end_date.is_unset()
            || matches!(
                subscription.end_date.try_cmp(&self.start_date),
                Some(Ordering::Greater | Ordering::Equal)
            );
        let service_matches = self
            .service_name()
            .map_or(true, |name| name == subscription.service_name.as_ref());
        let user_matches = self
            .user_id
            .map_or(true, |user_id| user_id == subscription.user_id);

        starts_before_window_ends && ends_after_window_starts && service_matches && user_matches
    }
}

impl TryFrom<SummaryBody> for SummaryQuery {
    type Error = ValidationError;

    fn try_from(body: SummaryBody) -> Result<Self, Self::Error> {
        SummaryQuery::new(body.start_date, body.end_date, body.service_name, body.user_id)
    }
}
