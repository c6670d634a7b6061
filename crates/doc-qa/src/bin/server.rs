//! Document Q&A server binary
//!
//! Run with: cargo run -p doc-qa --bin doc-qa-server

use std::path::PathBuf;

use clap::Parser;
use doc_qa::{config::AppConfig, server::DocQaServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "doc-qa-server", version, about = "Serve the document assistant over HTTP")]
struct Args {
    /// TOML config file; falls back to DOCQA_CONFIG, then built-in defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listen host
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "doc_qa=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║               📄 Document Q&A Assistant                   ║
║        Upload a PDF, DOCX or TXT file and ask away        ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    tracing::info!("Configuration loaded");
    tracing::info!("  - LLM model: {}", config.llm.model);
    tracing::info!("  - Embedding model: {}", config.embeddings.model);
    tracing::info!("  - Chunk size: {}", config.chunking.chunk_size);
    tracing::info!("  - Top-K: {}", config.retrieval.top_k);

    let server = DocQaServer::new(config.clone())?;

    tracing::info!("Checking Ollama at {}...", config.llm.base_url);
    if server.state().assistant().health_check().await {
        tracing::info!("Ollama is running");
    } else {
        server.state().set_ready(false);
        tracing::warn!("Ollama not available at {}", config.llm.base_url);
        tracing::warn!("Please start Ollama:");
        tracing::warn!("  1. Start: ollama serve");
        tracing::warn!(
            "  2. Pull models: ollama pull {} && ollama pull {}",
            config.llm.model,
            config.embeddings.model
        );
    }

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/sessions                          - Create a session");
    println!("  POST /api/sessions/:id/upload               - Upload and index a document");
    println!("  POST /api/sessions/:id/ask                  - Ask a question");
    println!("  GET  /api/sessions/:id/transcript/download  - Download the chat");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_take_config_flag() {
        let args = Args::try_parse_from(["doc-qa-server", "--config", "docqa.toml", "-p", "9000"])
            .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("docqa.toml")));
        assert_eq!(args.port, Some(9000));
        assert!(args.host.is_none());
    }

    #[test]
    fn test_args_reject_positional_path() {
        assert!(Args::try_parse_from(["doc-qa-server", "docqa.toml"]).is_err());
    }
}
