use nursery_server::{Config, Server, ServerState, init_logger, print_banner};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    init_logger();

    print_banner();

    tracing::info!("🌱 Nursery storefront server starting...");

    let config = Config::from_env();

    let state = ServerState::initialize(&config).await?;

    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
