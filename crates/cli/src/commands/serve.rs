//! `cocorabot serve` — Start the HTTP chat server.

use cocorabot_config::AppConfig;
use std::path::PathBuf;

pub async fn run(
    port_override: Option<u16>,
    knowledge_override: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }
    if let Some(path) = knowledge_override {
        config.knowledge.path = Some(path);
    }

    println!("🌴 Cocorabot");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Model: {}", config.model);
    match &config.knowledge.path {
        Some(path) => println!("   Knowledge base: {}", path.display()),
        None => println!("   Knowledge base: none (answers from model only)"),
    }

    cocorabot_gateway::start(config).await?;

    Ok(())
}
