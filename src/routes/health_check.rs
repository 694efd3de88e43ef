use actix_web::HttpResponse;

/// Liveness probe. It does not touch the subscription storage.
#[tracing::instrument(name = "Health check handler")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().finish()
}
