use anyhow::{Context, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use jarvis_orchestrator::{Orchestrator, Session, TurnOutcome};
use std::future::Future;
use std::io::{self, Write};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::launcher::Launcher;
use crate::output::{format_stats, print_action, print_reply};

fn spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

/// Prints the reply and carries out any side effect of one turn.
/// Returns the turn's summarization handles.
fn present(outcome: TurnOutcome, launcher: &Launcher) -> Vec<JoinHandle<()>> {
    print_reply(&outcome.reply);
    if let Some(effect) = &outcome.side_effect {
        match launcher.execute(effect) {
            Ok(url) => print_action(url, launcher.opens_urls()),
            Err(e) => {
                warn!(error = %e, "Failed to open URL");
                eprintln!("{}", format!("Could not open {}: {:#}", effect.url(), e).red());
            }
        }
    }
    outcome.summarizations
}

/// Lets pending summaries land before the process exits
async fn drain(handles: Vec<JoinHandle<()>>) {
    if handles.is_empty() {
        return;
    }
    debug!(count = handles.len(), "Waiting for memory summarization");
    for handle in handles {
        if let Err(e) = handle.await {
            warn!(error = %e, "Summarization task panicked");
        }
    }
}

/// Sends one prompt and displays the response
pub async fn run_single_query(
    orchestrator: &Orchestrator,
    launcher: &Launcher,
    prompt: &str,
) -> Result<()> {
    info!("Running single query");
    let mut session = Session::new();

    let spinner = spinner("Processing request...");
    let outcome = orchestrator.handle_utterance(&mut session, prompt).await;
    spinner.finish_and_clear();

    let pending = present(outcome, launcher);
    drain(pending).await;
    Ok(())
}

/// Runs a REPL until the user types `exit` or `quit`
pub async fn run_interactive_chat(orchestrator: &Orchestrator, launcher: &Launcher) -> Result<()> {
    println!("{}", "J.A.R.V.I.S online. How can I help, sir?".cyan().bold());
    println!("Type 'exit' or 'quit' to end the session.");
    println!();

    let mut session = Session::new();
    let mut pending = Vec::new();

    loop {
        print!("{}: ", "You".green().bold());
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut input = String::new();
        let read = io::stdin()
            .read_line(&mut input)
            .context("Failed to read input")?;
        if read == 0 {
            // EOF
            println!();
            break;
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            println!("Exiting chat session.");
            break;
        }

        let spinner = spinner("Thinking...");
        let outcome = orchestrator.handle_utterance(&mut session, input).await;
        spinner.finish_and_clear();

        pending.extend(present(outcome, launcher));
        pending.retain(|handle: &JoinHandle<()>| !handle.is_finished());
        println!("{}", format_stats(&session.stats).dimmed());
        println!();
    }

    drain(pending).await;
    Ok(())
}

/// Runs a code analysis or explanation and prints the result
pub async fn run_code_task(task: impl Future<Output = String>) {
    let spinner = spinner("Analyzing code...");
    let text = task.await;
    spinner.finish_and_clear();
    println!("{}", text);
}
