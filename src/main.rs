use std::sync::Arc;

use assistant_relay::assistant::OpenAiClient;
use assistant_relay::config::RelayConfig;
use assistant_relay::logging::{init_tracing, DEFAULT_LOG_FILTER};
use assistant_relay::relay::RelayService;
use assistant_relay::routes::configure_routes;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = RelayConfig::from_env()?;
    init_tracing(DEFAULT_LOG_FILTER, config.log_json);

    let client = OpenAiClient::new(config.api_key.clone(), config.base_url.clone())?;
    let relay = RelayService::new(Arc::new(client))
        .with_default_assistant(config.default_assistant_id.clone())
        .with_run_on_create(config.start_run_on_create);

    let routes = configure_routes(Arc::new(relay));

    let addr = config.socket_addr();
    info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %addr,
        start_run_on_create = config.start_run_on_create,
        "Starting assistant relay"
    );
    warp::serve(routes).run(addr).await;

    Ok(())
}
