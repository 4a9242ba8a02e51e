use anyhow::{bail, Context, Result};
use jarvis_orchestrator::SideEffect;
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Carries out side effects requested by the orchestrator
#[derive(Debug, Clone, Copy)]
pub struct Launcher {
    open_urls: bool,
}

impl Launcher {
    pub fn new(open_urls: bool) -> Self {
        Self { open_urls }
    }

    pub fn opens_urls(&self) -> bool {
        self.open_urls
    }

    /// Performs `effect`. Returns the URL that was (or would have been) opened.
    pub fn execute<'a>(&self, effect: &'a SideEffect) -> Result<&'a str> {
        let url = effect.url();
        if !self.open_urls {
            debug!(url, "URL opening disabled");
            return Ok(url);
        }

        let mut command = opener_command(url);
        let status = command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .with_context(|| format!("Failed to launch browser for {}", url))?;
        if !status.success() {
            bail!("Browser launcher exited with {}", status);
        }
        info!(url, "Opened URL");
        Ok(url)
    }
}

#[cfg(target_os = "macos")]
fn opener_command(url: &str) -> Command {
    let mut command = Command::new("open");
    command.arg(url);
    command
}

// Hands the URL to the shell URL handler directly; `cmd /C start` would
// interpret `&`, `|` and `^` inside the URL.
#[cfg(target_os = "windows")]
fn opener_command(url: &str) -> Command {
    let mut command = Command::new("rundll32");
    command.arg("url.dll,FileProtocolHandler").arg(url);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn opener_command(url: &str) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(url);
    command
}
