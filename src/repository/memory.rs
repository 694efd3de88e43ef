use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::billing::{total_cost, BillingRecord};
use crate::domain::subscription::{NewSubscription, Subscription};
use crate::domain::summary_query::SummaryQuery;
use crate::repository::{RepositoryError, SubscriptionRepository};

/// Process-local storage backend. Data lives as long as the repository does.
#[derive(Default)]
pub struct InMemorySubscriptionRepository {
    subscriptions: DashMap<Uuid, Subscription>,
}

impl InMemorySubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    #[tracing::instrument(name = "Insert a new subscription in memory", skip(self, new_subscription))]
    async fn create(
        &self,
        new_subscription: NewSubscription,
    ) -> Result<Subscription, RepositoryError> {
        loop {
            let id = Uuid::new_v4();

            if let Entry::Vacant(entry) = self.subscriptions.entry(id) {
                let subscription = Subscription::from_new(id, new_subscription);
                entry.insert(subscription.clone());

                return Ok(subscription);
            }
        }
    }

    #[tracing::instrument(name = "Read a subscription from memory", skip(self))]
    async fn read(&self, id: Uuid) -> Result<Subscription, RepositoryError> {
        self.subscriptions
            .get(&id)
            .map(|subscription| subscription.value().clone())
            .ok_or(RepositoryError::NotFound(id))
    }

    #[tracing::instrument(
        name = "Replace a subscription in memory",
        skip(self, subscription),
        fields(subscription_id = %subscription.id)
    )]
    async fn update(&self, subscription: &Subscription) -> Result<(), RepositoryError> {
        match self.subscriptions.get_mut(&subscription.id) {
            Some(mut stored) => {
                *stored = subscription.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound(subscription.id)),
        }
    }

    #[tracing::instrument(name = "Delete a subscription from memory", skip(self))]
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        self.subscriptions
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound(id))
    }

    #[tracing::instrument(name = "List user subscriptions from memory", skip(self))]
    async fn list(&self, user_id: Uuid) -> Result<Vec<Subscription>, RepositoryError> {
        Ok(self
            .subscriptions
            .iter()
            .filter(|subscription| subscription.user_id == user_id)
            .map(|subscription| subscription.value().clone())
            .collect())
    }

    #[tracing::instrument(name = "Summarize subscriptions from memory", skip(self))]
    async fn summary(&self, query: &SummaryQuery) -> Result<i64, RepositoryError> {
        let records: Vec<BillingRecord> = self
            .subscriptions
            .iter()
            .filter(|subscription| query.selects(subscription.value()))
            .map(|subscription| BillingRecord::from(subscription.value()))
            .collect();

        Ok(total_cost(query, records)?)
    }
}
