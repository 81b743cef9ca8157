//! mendr CLI and REST API entry point.
//!
//! Binary name: `mendr`
//!
//! Parses CLI arguments, initializes tracing and services, then dispatches
//! to the appropriate command handler or starts the REST API server.

mod cli;
mod http;
mod state;

use clap::Parser;
use tracing::error;

use cli::{Cli, Commands, MemoryCommand};
use mendr_observe::tracing_setup::{init_tracing, shutdown_tracing, verbosity_filter};
use state::{AppState, Environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(verbosity_filter(cli.verbose, cli.quiet), cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let outcome = run(cli).await;

    // Flush pending spans before exit, even on error.
    shutdown_tracing();
    outcome
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let env = Environment::load().await?;

    // Each command builds only the services it uses.
    match cli.command {
        Commands::Serve { port, host } => {
            let state = AppState::init(env).await?;
            let host = host.unwrap_or_else(|| state.config.server.host.clone());
            let port = port.unwrap_or(state.config.server.port);
            serve(state, &host, port).await?;
        }

        Commands::Ask { query } => {
            let state = AppState::init(env).await?;
            cli::ask::ask(&state, &query, cli.json).await?;
        }

        Commands::Feedback {
            query,
            response,
            feedback,
            correction,
        } => {
            let service = env.build_feedback_service().await?;
            cli::feedback::feedback(
                &service,
                &query,
                &response,
                &feedback,
                correction.as_deref(),
                cli.json,
            )
            .await?;
        }

        Commands::Memory { action } => match action {
            MemoryCommand::List => {
                let memory = env.build_memory().await?;
                cli::memory::list_memories(&memory, cli.json).await?;
            }
        },

        Commands::History { limit, feedback } => {
            let pool = env.open_database().await;
            cli::history::list_history(pool, limit, feedback, cli.json).await?;
        }
    }

    Ok(())
}

async fn serve(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!(
        "  {} mendr API listening on {}",
        console::style("⚡").bold(),
        console::style(format!("http://{addr}")).cyan()
    );
    println!(
        "  {} {}",
        console::style("data").dim(),
        state.data_dir.display()
    );
    println!("  {}", console::style("Press Ctrl+C to stop").dim());

    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    println!("\n  Server stopped.");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
///
/// A handler that cannot be installed never fires; the other one still can.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
