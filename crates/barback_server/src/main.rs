use barback_server::{run_server, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env()?;
    barback_logging::initialize(&config.log_destination(), config.log_level);
    config.log_summary();

    run_server(config).await
}
