use saferoads::config::{Config, REQUIRED_VARIABLES};
use saferoads::db::Database;

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = run().await {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::env().inspect_err(|e| {
        log::error!(
            "config: {e}. Check all required environment variables ({}) are set.",
            REQUIRED_VARIABLES.join(", ")
        );
    })?;

    config.log();

    let database = Database::connect(&config.pg_url).await?;
    log::info!("Connected to database");

    database.init_schema().await?;
    log::info!("Successfully ran init query");

    let geocoder = saferoads::api::geocoder::Client::new(&config.geocoder_addr)?;
    log::info!("Using geocoder at {}", config.geocoder_addr);

    let state = saferoads::api::service::State::new(database, geocoder, config.species.clone());

    let listen_addr = format!("0.0.0.0:{}", config.listen_port);
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;

    let router = saferoads::api::service::router::router(state);

    log::info!("Listening on {listen_addr}");
    axum::serve(listener, router).await?;

    Ok(())
}
