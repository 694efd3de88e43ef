use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};

use crate::domain::subscription::ValidationError;
use crate::domain::summary_query::{SummaryBody, SummaryQuery};
use crate::repository::{RepositoryError, SubscriptionRepository};
use crate::routes::{error_body, error_chain_fmt};

#[derive(serde::Serialize)]
struct SummaryResponse {
    summary: i64,
}

#[derive(thiserror::Error)]
pub enum SummaryError {
    #[error("{0}")]
    ValidationError(#[from] ValidationError),
    #[error("internal server error")]
    UnexpectedError(#[from] RepositoryError),
}

impl std::fmt::Debug for SummaryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for SummaryError {
    fn status_code(&self) -> StatusCode {
        match self {
            SummaryError::ValidationError(_) => StatusCode::BAD_REQUEST,
            SummaryError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(error_body(self))
    }
}

#[tracing::instrument(
    name = "Summarizing subscription costs handler",
    skip(body, repository),
    fields(
        start_date = %body.start_date,
        end_date = %body.end_date
    )
)]
pub async fn handle_summary(
    body: web::Json<SummaryBody>,
    repository: web::Data<dyn SubscriptionRepository>,
) -> Result<HttpResponse, SummaryError> {
    let query = SummaryQuery::try_from(body.into_inner())?;
    let summary = repository.summary(&query).await.map_err(|err| {
        tracing::error!("Failed to compute the summary: {:?}", err);
        err
    })?;

    Ok(HttpResponse::Ok().json(SummaryResponse { summary }))
}
