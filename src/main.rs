mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use cuesplice::edge::splice_preroll;
use cuesplice::{config, server};
use cuesplice_hls::Playlist;

async fn start_server(host: String, port: u16, config_path: Option<&std::path::Path>) -> Result<()> {
    // Load config
    let mut config = config::load_config_or_default(config_path)?;

    // Override host/port from CLI if specified
    config.server.host = host;
    config.server.port = port;

    tracing::info!("Starting cuesplice edge proxy");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );
    if let Some(origin) = &config.origin {
        tracing::info!(
            "Forwarding to origin {}://{}:{}",
            origin.protocol,
            origin.domain_name,
            origin.port
        );
    }

    server::start_server(config).await
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "cuesplice=trace,cuesplice_hls=trace,tower_http=debug".to_string()
        } else {
            "cuesplice=debug,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            // Create tokio runtime
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Splice { input } => splice_file(&input, cli.config.as_deref()),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate(path.as_deref())
        }
        Commands::Version => {
            println!("cuesplice {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Offline splice: rewrite a playlist file the way the interceptor would
/// and print the result.
fn splice_file(input: &std::path::Path, config_path: Option<&std::path::Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let preroll = config.preroll;

    if !input.exists() {
        anyhow::bail!("Input file does not exist: {:?}", input);
    }
    let text = std::fs::read_to_string(input)?;

    match cuesplice_hls::parse(&text)? {
        Playlist::Master(master) => {
            tracing::info!("master playlist, passing through unchanged");
            print!("{}", master.render());
        }
        Playlist::Media(mut media) => {
            splice_preroll(&mut media, &preroll);
            print!("{}", media.render());
        }
    }

    Ok(())
}

fn validate(config_path: Option<&std::path::Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    config::validate_config(&config)?;
    println!("Configuration OK");
    Ok(())
}
