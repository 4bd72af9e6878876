//! Interactive natural-language task chat REPL.

use anyhow::Result;
use clap::Parser;
use std::io::{self, BufRead, Write};
use task_chat::config::Config;
use task_chat::engine::Engine;
use task_chat::extract::Extractor;
use task_chat::oracle::HttpOracle;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "task-chat", version, about = "Manage a task list in plain English")]
struct Cli {
    /// Path to a YAML config file (default: ~/.task-chat/config.yaml).
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Disable the LLM oracle even when configured.
    #[arg(long)]
    no_oracle: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    let mut extractor = Extractor::new();
    if config.oracle.enabled && !cli.no_oracle {
        tracing::info!(model = %config.oracle.model, "oracle enabled");
        extractor = extractor.with_oracle(Box::new(HttpOracle::new(&config.oracle)));
    }
    let engine = Engine::new(extractor);

    println!("task-chat — type 'help' for examples, 'quit' to exit");
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        let text = line.trim();

        match text {
            "" => continue,
            "quit" | "exit" => break,
            "help" => {
                print_help();
                continue;
            }
            "stats" => {
                let counts = engine.store().counts();
                println!(
                    "{} task(s): {} completed, {} pending",
                    counts.total, counts.completed, counts.pending
                );
                continue;
            }
            _ => {}
        }

        let response = engine.process_message(text).await;
        println!("{}", response.message);
        for action in &response.actions_performed {
            println!("  → {action}");
        }
    }

    println!("Goodbye!");
    Ok(())
}

fn print_help() {
    println!("Examples:");
    println!("  add task buy milk #shopping 2025-12-20");
    println!("  show tasks / show completed tasks");
    println!("  change task 3 to 'Buy oat milk'");
    println!("  mark task 1 as done");
    println!("  delete task 2");
    println!("  stats");
}
