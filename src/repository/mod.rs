use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::billing::CostOverflow;
use crate::domain::subscription::{NewSubscription, Subscription};
use crate::domain::summary_query::SummaryQuery;

pub mod memory;
pub mod postgres;

pub use memory::InMemorySubscriptionRepository;
pub use postgres::PostgresSubscriptionRepository;

#[derive(thiserror::Error, Debug)]
pub enum RepositoryError {
    #[error("Subscription {0} does not exist.")]
    NotFound(Uuid),
    #[error("Failed to access the subscription storage.")]
    Storage(#[from] sqlx::Error),
    #[error("Failed to total the subscription costs.")]
    CostOverflow(#[from] CostOverflow),
}

/// Persistence of subscription records. Callers validate records before handing them over;
/// implementations only enforce storage-level constraints.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Stores a new subscription under a freshly assigned id.
    async fn create(&self, new_subscription: NewSubscription)
        -> Result<Subscription, RepositoryError>;

    async fn read(&self, id: Uuid) -> Result<Subscription, RepositoryError>;

    /// Replaces every field of the subscription identified by `subscription.id`.
    async fn update(&self, subscription: &Subscription) -> Result<(), RepositoryError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;

    async fn list(&self, user_id: Uuid) -> Result<Vec<Subscription>, RepositoryError>;

    /// Total spent over the query window, see [`crate::domain::billing`].
    async fn summary(&self, query: &SummaryQuery) -> Result<i64, RepositoryError>;
}
