use actix_web::dev::Server;
use actix_web::error::InternalError;
use actix_web::{web, App, HttpResponse, HttpServer};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

use crate::config::{DatabaseSettings, ServerTimeouts, Settings, StorageBackend};
use crate::repository::{
    InMemorySubscriptionRepository, PostgresSubscriptionRepository, SubscriptionRepository,
};
use crate::routes::{
    error_body, handle_create_subscription, handle_delete_subscription, handle_list_subscriptions,
    handle_read_subscription, handle_summary, handle_update_subscription, health_check,
};

pub struct Application {
    pub port: u16,
    pub server: Server,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, std::io::Error> {
        let repository = get_repository(&config);
        let listener = TcpListener::bind(config.get_address())?;
        let port = listener.local_addr()?.port();
        let server = run(listener, repository, config.get_server_timeouts())?;

        tracing::info!(
            "Server listening on {} with {:?} storage",
            config.get_address(),
            config.get_storage_backend()
        );

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stop(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn get_repository(config: &Settings) -> Arc<dyn SubscriptionRepository> {
    match config.get_storage_backend() {
        StorageBackend::Postgres => Arc::new(PostgresSubscriptionRepository::new(
            get_connection_db_pool(&config.database),
        )),
        StorageBackend::Memory => Arc::new(InMemorySubscriptionRepository::new()),
    }
}

pub fn run(
    listener: TcpListener,
    repository: Arc<dyn SubscriptionRepository>,
    timeouts: ServerTimeouts,
) -> Result<Server, std::io::Error> {
    let repository = web::Data::from(repository);
    // Malformed bodies (bad JSON, invalid MM-YYYY dates or ids) answer with the same error shape as the handlers
    let json_config = web::JsonConfig::default().error_handler(|err, _| {
        tracing::error!("Invalid request body: {:?}", err);
        let response = HttpResponse::BadRequest().json(error_body(&"bad request"));

        InternalError::from_response(err, response).into()
    });

    let server = HttpServer::new(move || {
        // App is where your application logic lives: routing, middlewares, request handler, etc
        App::new()
            // 'wrap' method adds a middleware to the App. This specific middleware provide incoming
            // request logger
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .service(
                web::scope("/subs")
                    .route("", web::post().to(handle_create_subscription))
                    .route("/summary", web::post().to(handle_summary))
                    .route("/list/{user_id}", web::get().to(handle_list_subscriptions))
                    .route("/{id}", web::get().to(handle_read_subscription))
                    .route("/{id}", web::put().to(handle_update_subscription))
                    .route("/{id}", web::delete().to(handle_delete_subscription)),
            )
            .app_data(json_config.clone())
            .app_data(repository.clone())
    })
    .client_request_timeout(timeouts.client_request)
    .client_disconnect_timeout(timeouts.client_disconnect)
    .keep_alive(timeouts.keep_alive)
    .shutdown_timeout(timeouts.shutdown.as_secs())
    .listen(listener)?
    .run();

    Ok(server)
}

pub fn get_connection_db_pool(config: &DatabaseSettings) -> Pool<Postgres> {
    PgPoolOptions::new()
        .acquire_timeout(config.get_acquire_timeout())
        .connect_lazy_with(config.get_db_options())
}
