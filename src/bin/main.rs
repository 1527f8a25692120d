use clap::Parser;
use onchainbrain_agent::{
    agent::Orchestrator,
    analytics::BitqueryClient,
    cli::{Cli, Invocation, USAGE},
    config::Config,
    dispatch::Dispatcher,
    registry::HttpRegistry,
};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load environment variables
    dotenv::dotenv().ok();

    // Logs go to stderr so stdout only carries answers
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let invocation = match cli.invocation() {
        Ok(invocation) => invocation,
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            return ExitCode::from(2);
        }
    };

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let http = match config.http_client() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Failed to build HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Create components
    let registry = Box::new(HttpRegistry::new(http.clone(), &config));
    let source = Arc::new(BitqueryClient::new(http, &config));
    let orchestrator = Orchestrator::new(registry, Dispatcher::new(source));

    info!(
        analytics = %config.analytics_endpoint,
        registry = %config.registry_url,
        "OnChainBrain agent starting"
    );

    let transcript = match invocation {
        Invocation::List => orchestrator.list_agents().await,
        Invocation::Register { name, personality } => {
            orchestrator.register(&name, personality.as_deref()).await
        }
        Invocation::Ask {
            agent_name,
            question,
        } => orchestrator.ask(&agent_name, &question).await,
    };

    transcript.print();
    ExitCode::SUCCESS
}
