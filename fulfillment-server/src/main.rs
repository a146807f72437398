use fulfillment_server::{Config, Server, ServerState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (dotenv) and configuration
    dotenv::dotenv().ok();
    let config = Config::from_env();

    // 2. Logging
    fulfillment_server::init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());

    tracing::info!("Fulfillment server starting...");

    // 3. Initialize server state (storage, services)
    let state = ServerState::initialize(&config).await?;

    // 4. Run the HTTP server until shutdown
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e);
    }

    Ok(())
}
