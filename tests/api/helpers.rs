use once_cell::sync::Lazy;
use reqwest::Response;
use sqlx::{migrate, Connection, Executor, PgConnection, PgPool};
use uuid::Uuid;

use subs_aggregator::{
    config::{get_configuration, DatabaseSettings, Settings, StorageBackend},
    startup::{get_connection_db_pool, Application},
    telemetry::{get_subscriber, init_subscriber},
};

// Logs are only printed when TEST_LOG is set, e.g. `TEST_LOG=true cargo test | bunyan`
static TRACING: Lazy<()> = Lazy::new(|| {
    let name = String::from("test");
    let env_filter = String::from("info");

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(name, env_filter, std::io::stdout);
        init_subscriber(subscriber).expect("Failed to init the tracing subscriber.");
    } else {
        let subscriber = get_subscriber(name, env_filter, std::io::sink);
        init_subscriber(subscriber).expect("Failed to init the tracing subscriber.");
    }
});

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawns the application backed by the in-memory storage, so every test gets an empty store.
    pub async fn spawn_app() -> TestApp {
        let mut config = get_configuration().expect("Missing configuration file.");

        config.set_storage_backend(StorageBackend::Memory);

        TestApp::spawn_with(config).await
    }

    pub async fn spawn_with(mut config: Settings) -> TestApp {
        Lazy::force(&TRACING);

        // We are using port 0 as way to define a different port per each test. Port 0 is a special case that operating systems
        // take into account: when port is 0, the OS will search for the first available port
        config.set_app_port(0);

        let application = Application::build(config)
            .await
            .expect("Failed to build application.");

        let address = format!("http://127.0.0.1:{}", application.get_port());

        tokio::spawn(application.run_until_stop());

        TestApp {
            address,
            client: reqwest::Client::new(),
        }
    }

    pub async fn post_subscription(&self, body: &serde_json::Value) -> Response {
        self.client
            .post(format!("{}/subs", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_subscription(&self, id: &str) -> Response {
        self.client
            .get(format!("{}/subs/{}", self.address, id))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn put_subscription(&self, id: &str, body: &serde_json::Value) -> Response {
        self.client
            .put(format!("{}/subs/{}", self.address, id))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn delete_subscription(&self, id: &str) -> Response {
        self.client
            .delete(format!("{}/subs/{}", self.address, id))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn list_subscriptions(&self, user_id: &str) -> Response {
        self.client
            .get(format!("{}/subs/list/{}", self.address, user_id))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_summary(&self, body: &serde_json::Value) -> Response {
        self.client
            .post(format!("{}/subs/summary", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Creates a subscription and returns the stored record as answered by the API.
    pub async fn create_subscription(&self, body: serde_json::Value) -> serde_json::Value {
        let response = self.post_subscription(&body).await;

        assert_eq!(201, response.status().as_u16());

        response.json().await.expect("Failed to read the created subscription.")
    }

    pub async fn summary_of(&self, body: serde_json::Value) -> i64 {
        let response = self.post_summary(&body).await;

        assert_eq!(200, response.status().as_u16());

        let summary: serde_json::Value = response.json().await.expect("Failed to read summary.");

        summary["summary"].as_i64().expect("Summary is not a number.")
    }
}

pub fn subscription_body(
    service_name: &str,
    price: i64,
    user_id: Uuid,
    start_date: &str,
    end_date: Option<&str>,
) -> serde_json::Value {
    serde_json::json!({
        "service_name": service_name,
        "price": price,
        "user_id": user_id,
        "start_date": start_date,
        "end_date": end_date,
    })
}

/// Creates a brand new database with the migrations applied and points `db_config` to it.
pub async fn configure_db(db_config: &mut DatabaseSettings) -> PgPool {
    let db_test_name = format!("db_{}", Uuid::new_v4().to_string().replace('-', "_"));

    // Create database
    let mut connection = PgConnection::connect_with(&db_config.get_server_options())
        .await
        .expect("Failed to connect to Postgres.");

    connection
        .execute(&*format!(r#"CREATE DATABASE "{}";"#, db_test_name))
        .await
        .expect("Failed to create database.");

    connection
        .close()
        .await
        .expect("Failed to close connection.");

    // Execute migrations
    db_config.set_name(db_test_name);

    let db_pool = get_connection_db_pool(db_config);

    migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run migrations.");

    db_pool
}
