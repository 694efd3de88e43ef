use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::billing::{total_cost, BillingRecord};
use crate::domain::month_date::MonthDate;
use crate::domain::service_name::ServiceName;
use crate::domain::subscription::{NewSubscription, Subscription, ValidationError};
use crate::domain::summary_query::SummaryQuery;
use crate::repository::{RepositoryError, SubscriptionRepository};

pub struct PostgresSubscriptionRepository {
    db_pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct SubscriptionRow {
    id: Uuid,
    service_name: String,
    price: i64,
    user_id: Uuid,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
}

#[derive(sqlx::FromRow)]
struct BillingRow {
    price: i64,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = ValidationError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        Ok(Subscription {
            id: row.id,
            service_name: ServiceName::parse(row.service_name)?,
            price: row.price,
            user_id: row.user_id,
            start_date: row.start_date.into(),
            end_date: row.end_date.into(),
        })
    }
}

impl From<BillingRow> for BillingRecord {
    fn from(row: BillingRow) -> Self {
        BillingRecord {
            price: row.price,
            start_date: row.start_date.into(),
            end_date: row.end_date.into(),
        }
    }
}

/// A stored row that no longer satisfies the domain invariants is reported as a decode failure.
fn decode_row(row: SubscriptionRow) -> Result<Subscription, sqlx::Error> {
    Subscription::try_from(row).map_err(|err| sqlx::Error::Decode(Box::new(err)))
}

/// Columns are bound as plain dates; a `MonthDate` is always stored as the first day of its month.
fn storage_date(date: &MonthDate) -> Option<NaiveDate> {
    date.as_naive_date()
}

impl PostgresSubscriptionRepository {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SubscriptionRepository for PostgresSubscriptionRepository {
    #[tracing::instrument(
        name = "Insert a new subscription into the database",
        skip(self, new_subscription),
        fields(service_name = %new_subscription.service_name.as_ref())
    )]
    async fn create(
        &self,
        new_subscription: NewSubscription,
    ) -> Result<Subscription, RepositoryError> {
        let row = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            INSERT INTO subscriptions (id, service_name, price, user_id, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, service_name, price, user_id, start_date, end_date
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new_subscription.service_name.as_ref())
        .bind(new_subscription.price)
        .bind(new_subscription.user_id)
        .bind(storage_date(&new_subscription.start_date))
        .bind(storage_date(&new_subscription.end_date))
        .fetch_one(&self.db_pool)
        .await
        .map_err(|err| {
            tracing::error!("Failed to execute query: {:?}", err);
            err
        })?;

        Ok(decode_row(row)?)
    }

    #[tracing::instrument(name = "Read a subscription from the database", skip(self))]
    async fn read(&self, id: Uuid) -> Result<Subscription, RepositoryError> {
        let row = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT id, service_name, price, user_id, start_date, end_date
            FROM subscriptions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(RepositoryError::NotFound(id))?;

        Ok(decode_row(row)?)
    }

    #[tracing::instrument(
        name = "Update a subscription in the database",
        skip(self, subscription),
        fields(subscription_id = %subscription.id)
    )]
    async fn update(&self, subscription: &Subscription) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE subscriptions
            SET service_name = $1, price = $2, user_id = $3, start_date = $4, end_date = $5
            WHERE id = $6
            "#,
        )
        .bind(subscription.service_name.as_ref())
        .bind(subscription.price)
        .bind(subscription.user_id)
        .bind(storage_date(&subscription.start_date))
        .bind(storage_date(&subscription.end_date))
        .bind(subscription.id)
        .execute(&self.db_pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(subscription.id));
        }

        Ok(())
    }

    #[tracing::instrument(name = "Delete a subscription from the database", skip(self))]
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM subscriptions WHERE id = $1")
            .bind(id)
            .execute(&self.db_pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id));
        }

        Ok(())
    }

    #[tracing::instrument(name = "List user subscriptions from the database", skip(self))]
    async fn list(&self, user_id: Uuid) -> Result<Vec<Subscription>, RepositoryError> {
        let rows = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT id, service_name, price, user_id, start_date, end_date
            FROM subscriptions
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db_pool)
        .await?;

        let subscriptions = rows
            .into_iter()
            .map(decode_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(subscriptions)
    }

    #[tracing::instrument(name = "Summarize subscriptions from the database", skip(self))]
    async fn summary(&self, query: &SummaryQuery) -> Result<i64, RepositoryError> {
        // Only the overlap and the optional filters are resolved here, the clipping is done
        // by the billing engine.
        let rows = sqlx::query_as::<_, BillingRow>(
            r#"
            SELECT price, start_date, end_date
            FROM subscriptions
            WHERE start_date <= $2
              AND (end_date IS NULL OR end_date >= $1)
              AND ($3::TEXT IS NULL OR service_name = $3)
              AND ($4::UUID IS NULL OR user_id = $4)
            "#,
        )
        .bind(storage_date(&query.start_date()))
        .bind(storage_date(&query.end_date()))
        .bind(query.service_name())
        .bind(query.user_id())
        .fetch_all(&self.db_pool)
        .await
        .map_err(|err| {
            tracing::error!("Failed to fetch the summary rows: {:?}", err);
            err
        })?;

        Ok(total_cost(query, rows.into_iter().map(BillingRecord::from))?)
    }
}
