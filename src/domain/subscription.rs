use serde::Deserialize;
use std::cmp::Ordering;
use uuid::Uuid;

use crate::domain::month_date::MonthDate;
use crate::domain::service_name::ServiceName;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("negative price")]
    NegativePrice,
    #[error("start_date is required")]
    StartDateRequired,
    #[error("dates are required")]
    DatesRequired,
    #[error("end date should not be before start date")]
    EndBeforeStart,
    #[error("user_id is required")]
    UserIdRequired,
    #[error("service_name is required")]
    ServiceNameRequired,
    #[error("service_name is too long")]
    ServiceNameTooLong,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Subscription {
    pub id: Uuid,
    pub service_name: ServiceName,
    pub price: i64,
    pub user_id: Uuid,
    pub start_date: MonthDate,
    pub end_date: MonthDate,
}

/// A subscription that has not been persisted yet, so it has no id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscription {
    pub service_name: ServiceName,
    pub price: i64,
    pub user_id: Uuid,
    pub start_date: MonthDate,
    pub end_date: MonthDate,
}

/// Request body shared by the create and update endpoints.
#[derive(Deserialize, Debug)]
pub struct SubscriptionBody {
    #[serde(default)]
    pub service_name: String,
    #[serde(default)]
    pub price: i64,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub start_date: MonthDate,
    #[serde(default)]
    pub end_date: MonthDate,
}

impl Subscription {
    pub fn from_new(id: Uuid, new_subscription: NewSubscription) -> Subscription {
        Subscription {
            id,
            service_name: new_subscription.service_name,
            price: new_subscription.price,
            user_id: new_subscription.user_id,
            start_date: new_subscription.start_date,
            end_date: new_subscription.end_date,
        }
    }
}

impl TryFrom<SubscriptionBody> for NewSubscription {
    type Error = ValidationError;

    fn try_from(body: SubscriptionBody) -> Result<Self, Self::Error> {
        validate_billing_terms(body.price, &body.start_date, &body.end_date)?;

        let user_id = match body.user_id {
            Some(user_id) if !user_id.is_nil() => user_id,
            _ => return Err(ValidationError::UserIdRequired),
        };

        let service_name = ServiceName::parse(body.service_name)?;

        Ok(NewSubscription {
            service_name,
            price: body.price,
            user_id,
            start_date: body.start_date,
            end_date: body.end_date,
        })
    }
}

/// Checks the price and the lifetime of a subscription: the price must not be negative, the
/// start month is mandatory and an end month, when present, must not precede it.
pub fn validate_billing_terms(
    price: i64,
    start_date: &MonthDate,
    end_date: &MonthDate,
) -> Result<(), ValidationError> {
    if price < 0 {
        return Err(ValidationError::NegativePrice);
    }

    if start_date.is_unset() {
        return Err(ValidationError::StartDateRequired);
    }

    if matches!(end_date.try_cmp(start_date), Some(Ordering::Less)) {
        return Err(ValidationError::EndBeforeStart);
    }

    Ok(())
}
