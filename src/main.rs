use dotenv::dotenv;
use filmhub::configuration::get_configuration;
use filmhub::startup;
use filmhub::telemetry::{get_subscriber, init_subscriber};
use filmhub::util::check_for_necessary_env;
use std::net::TcpListener;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    let subscriber = get_subscriber("filmhub", "info", std::io::stdout);
    init_subscriber(subscriber);

    let configuration = get_configuration("configuration").map_err(|err| {
        std::io::Error::other(format!(
            "Failed to read `configuration.json`. Please make sure it is valid JSON: {}",
            err
        ))
    })?;
    check_for_necessary_env(&configuration)?;

    let listener = TcpListener::bind(configuration.application.address())?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    startup::run_server(listener, configuration)?.await
}
