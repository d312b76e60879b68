//! Corral - CLI entry point.
//!
//! Parses the prompt, loads configuration from the environment, and runs
//! the agent loop once. Exit codes: 0 on a final answer or iteration
//! budget exhaustion, 1 on a fatal loop or configuration error, 2 on CLI
//! usage errors (clap's default).

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use corral::agent::{Agent, RunOutcome};
use corral::config::Config;

#[derive(Parser)]
#[command(name = "corral", about = "Sandboxed CLI coding agent", version)]
struct Cli {
    /// The task or question for the agent. Multiple tokens are joined
    /// with spaces.
    #[arg(required = true)]
    prompt: Vec<String>,

    /// Print the prompt, per-call token usage, and tool traffic.
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "corral=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let prompt = cli.prompt.join(" ");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(
        model = %config.model,
        workspace = %config.workspace_path.display(),
        "loaded configuration"
    );

    if cli.verbose {
        println!("User prompt: {}\n", prompt);
    }

    let agent = Agent::new(config);

    match agent.run(&prompt, cli.verbose).await {
        Ok(RunOutcome::Completed(text)) => {
            println!("Final response:");
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Ok(RunOutcome::BudgetExhausted { iterations }) => {
            println!(
                "Reached maximum iterations ({}). The agent may not have completed the task.",
                iterations
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
