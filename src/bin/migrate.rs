use std::io::{Error, ErrorKind};

use subs_aggregator::config::get_configuration;
use subs_aggregator::startup::get_connection_db_pool;
use subs_aggregator::telemetry::{get_subscriber, init_subscriber};

const USAGE: &str = "usage: migrate up";

/// Applies the pending migrations of `./migrations` to the configured database.
#[tokio::main]
async fn main() -> std::io::Result<()> {
    let subscriber = get_subscriber(
        String::from("subs_aggregator_migrate"),
        String::from("info"),
        std::io::stdout,
    );

    init_subscriber(subscriber).map_err(|err| Error::new(ErrorKind::Other, err))?;

    match std::env::args().nth(1).as_deref() {
        Some("up") => {}
        Some(command) => {
            tracing::error!("Unknown command {}. {}", command, USAGE);
            return Err(Error::new(ErrorKind::InvalidInput, USAGE));
        }
        None => {
            tracing::error!("Missing command. {}", USAGE);
            return Err(Error::new(ErrorKind::InvalidInput, USAGE));
        }
    }

    let config = get_configuration().map_err(|err| Error::new(ErrorKind::Other, err))?;
    let db_pool = get_connection_db_pool(&config.database);

    tracing::info!("Applying migrations to database {}", config.get_db_name());

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .map_err(|err| {
            tracing::error!("Failed to apply migrations: {:?}", err);
            Error::new(ErrorKind::Other, err)
        })?;

    tracing::info!("Migrations applied successfully");

    Ok(())
}
