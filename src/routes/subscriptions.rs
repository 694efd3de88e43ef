use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use uuid::Uuid;

use crate::domain::subscription::{NewSubscription, Subscription, SubscriptionBody, ValidationError};
use crate::repository::{RepositoryError, SubscriptionRepository};
use crate::routes::{error_body, error_chain_fmt};

#[derive(thiserror::Error)]
pub enum SubscriptionError {
    #[error("{0}")]
    ValidationError(#[from] ValidationError),
    #[error("invalid id")]
    InvalidId(#[source] uuid::Error),
    #[error("subscription not found")]
    NotFound,
    #[error("internal server error")]
    UnexpectedError(#[source] RepositoryError),
}

impl From<RepositoryError> for SubscriptionError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(_) => SubscriptionError::NotFound,
            err => SubscriptionError::UnexpectedError(err),
        }
    }
}

impl std::fmt::Debug for SubscriptionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for SubscriptionError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubscriptionError::ValidationError(_) => StatusCode::BAD_REQUEST,
            SubscriptionError::InvalidId(_) => StatusCode::BAD_REQUEST,
            SubscriptionError::NotFound => StatusCode::NOT_FOUND,
            SubscriptionError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(error_body(self))
    }
}

fn parse_id(id: &str) -> Result<Uuid, SubscriptionError> {
    Uuid::parse_str(id).map_err(SubscriptionError::InvalidId)
}

#[tracing::instrument(
    name = "Creating a new subscription handler",
    skip(body, repository),
    fields(
        service_name = %body.service_name,
        price = %body.price
    )
)]
pub async fn handle_create_subscription(
    body: web::Json<SubscriptionBody>,
    repository: web::Data<dyn SubscriptionRepository>,
) -> Result<HttpResponse, SubscriptionError> {
    let new_subscription = NewSubscription::try_from(body.into_inner()).map_err(|err| {
        tracing::error!("Validation error: {:?}", err);
        err
    })?;

    let subscription = repository.create(new_subscription).await.map_err(|err| {
        tracing::error!("Failed to insert new subscription: {:?}", err);
        err
    })?;

    Ok(HttpResponse::Created().json(subscription))
}

#[tracing::instrument(name = "Reading a subscription handler", skip(repository))]
pub async fn handle_read_subscription(
    id: web::Path<String>,
    repository: web::Data<dyn SubscriptionRepository>,
) -> Result<HttpResponse, SubscriptionError> {
    let id = parse_id(&id)?;
    let subscription = repository.read(id).await?;

    Ok(HttpResponse::Ok().json(subscription))
}

#[tracing::instrument(
    name = "Updating a subscription handler",
    skip(body, repository),
    fields(
        service_name = %body.service_name,
        price = %body.price
    )
)]
pub async fn handle_update_subscription(
    id: web::Path<String>,
    body: web::Json<SubscriptionBody>,
    repository: web::Data<dyn SubscriptionRepository>,
) -> Result<HttpResponse, SubscriptionError> {
    let id = parse_id(&id)?;
    let subscription = Subscription::from_new(id, NewSubscription::try_from(body.into_inner())?);

    repository.update(&subscription).await?;

    Ok(HttpResponse::Ok().json(subscription))
}

#[tracing::instrument(name = "Deleting a subscription handler", skip(repository))]
pub async fn handle_delete_subscription(
    id: web::Path<String>,
    repository: web::Data<dyn SubscriptionRepository>,
) -> Result<HttpResponse, SubscriptionError> {
    let id = parse_id(&id)?;

    repository.delete(id).await?;

    Ok(HttpResponse::Ok().finish())
}

#[tracing::instrument(name = "Listing user subscriptions handler", skip(repository))]
pub async fn handle_list_subscriptions(
    user_id: web::Path<String>,
    repository: web::Data<dyn SubscriptionRepository>,
) -> Result<HttpResponse, SubscriptionError> {
    let user_id = parse_id(&user_id)?;
    let subscriptions = repository.list(user_id).await?;

    Ok(HttpResponse::Ok().json(subscriptions))
}
