use std::io::{Error, ErrorKind};

use subs_aggregator::config::get_configuration;
use subs_aggregator::startup::Application;
use subs_aggregator::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let subscriber = get_subscriber(
        String::from("subs_aggregator"),
        String::from("info"),
        std::io::stdout,
    );

    init_subscriber(subscriber).map_err(|err| Error::new(ErrorKind::Other, err))?;

    let config = get_configuration().map_err(|err| Error::new(ErrorKind::Other, err))?;
    let application = Application::build(config).await?;

    application.run_until_stop().await?;

    tracing::info!("Server stopped gracefully");

    Ok(())
}
