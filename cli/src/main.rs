use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use jarvis_core::config::JarvisConfig;
use jarvis_memory::{FileKeyValueStore, MemoryStore};
use jarvis_orchestrator::{
    AnalysisMode, Capabilities, CodeAssistant, Orchestrator, OrchestratorSettings,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

mod app;
mod cli;
mod launcher;
mod logging;
mod output;

use crate::cli::{Args, ModeArg};
use crate::launcher::Launcher;
use crate::output::{print_memory, print_usage_instructions};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let config = JarvisConfig::load(args.config.as_deref())
        .context("Failed to load configuration")?
        .merge(&args.config_overrides());

    logging::init(config.log_level(), args.verbose);

    let memory_path = config
        .memory_path()
        .context("Failed to resolve memory path")?;
    debug!(path = %memory_path.display(), "Using memory file");
    let memory = MemoryStore::new(Arc::new(FileKeyValueStore::new(memory_path)));

    if args.clear_memory {
        memory.clear().await.context("Failed to clear memory")?;
        println!("{}", "Memory archive cleared.".green());
        return Ok(());
    }

    if let Some(fact) = &args.remember {
        if memory.add_fact(fact).await.context("Failed to store fact")? {
            println!("{} {}", "Remembered:".green(), fact);
        } else {
            println!("{}", "Already known.".dimmed());
        }
        return Ok(());
    }

    if args.show_memory {
        let record = memory.load().await.context("Failed to load memory")?;
        print_memory(&record);
        return Ok(());
    }

    if args.analyze.is_some() || args.explain.is_some() {
        let assistant = CodeAssistant::new(
            Capabilities::from_config(&config).generator,
            config.model_name(),
            config.memory_model(),
        );
        if let Some(path) = &args.analyze {
            let code = read_source(path).await?;
            let mode = analysis_mode(&args);
            info!(path = %path.display(), ?mode, "Analyzing file");
            app::run_code_task(assistant.analyze(&code, &mode)).await;
        } else if let Some(path) = &args.explain {
            let code = read_source(path).await?;
            info!(path = %path.display(), "Explaining file");
            app::run_code_task(assistant.explain(&code)).await;
        }
        return Ok(());
    }

    let orchestrator = Orchestrator::new(
        Capabilities::from_config(&config),
        memory,
        OrchestratorSettings::from_config(&config),
    );
    let launcher = Launcher::new(!args.no_open);

    if args.interactive {
        if let Err(e) = app::run_interactive_chat(&orchestrator, &launcher).await {
            eprintln!("{}", format!("Interactive chat failed: {:#}", e).red());
            return Err(e);
        }
    } else if let Some(prompt) = args.prompt {
        app::run_single_query(&orchestrator, &launcher, &prompt).await?;
    } else {
        print_usage_instructions();
    }

    Ok(())
}

fn analysis_mode(args: &Args) -> AnalysisMode {
    match args.mode {
        ModeArg::Debug => AnalysisMode::Debug,
        ModeArg::Optimize => AnalysisMode::Optimize,
        ModeArg::Custom => AnalysisMode::Custom(args.instruction.clone().unwrap_or_default()),
    }
}

async fn read_source(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}
