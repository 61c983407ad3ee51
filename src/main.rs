/*!
 * completion-relay - Main Entry Point
 *
 * Bridges a client-driven prompt stream to a server-pushed reply stream,
 * with a single sequential completion call in between:
 * client -> input queue -> processing loop -> completion service ->
 * output queue -> client(s)
 */

use completion_relay::{
    init_tracing, start_grpc_server, Config, HttpCompletionClient, PipeConnectionManager,
    ProcessingLoop, ServerConfig,
};
use std::error::Error;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize structured tracing
    init_tracing();

    info!("completion-relay starting");

    let config = Config::from_env()?;
    info!(
        addr = %config.listen_addr,
        capacity = config.queue_capacity,
        model = %config.completion_model,
        "configuration loaded"
    );

    let manager = Arc::new(PipeConnectionManager::new(config.queue_capacity));
    let client = Arc::new(HttpCompletionClient::new(&config)?);

    let worker = ProcessingLoop::new(Arc::clone(&manager), client);
    tokio::spawn(worker.run());
    info!("processing loop spawned");

    let server_config = ServerConfig::new(config.listen_addr);
    let server_manager = Arc::clone(&manager);
    let server = tokio::spawn(async move { start_grpc_server(server_config, server_manager).await });

    tokio::select! {
        result = server => {
            if let Ok(Err(e)) = result {
                error!(error = %e, "gRPC server error");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    manager.shutdown();
    info!("completion-relay stopped");
    Ok(())
}
