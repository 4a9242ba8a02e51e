use clap::{Parser, ValueEnum};
use jarvis_core::config::JarvisConfig;
use std::path::PathBuf;

/// Terminal front end for the J.A.R.V.I.S assistant
#[derive(Parser, Debug)]
#[command(name = "jarvis", author, version, about, long_about = None)]
pub struct Args {
    /// The prompt to send
    #[arg(index = 1)]
    pub prompt: Option<String>,

    /// Enter interactive chat mode
    #[arg(short, long, default_value_t = false)]
    pub interactive: bool,

    /// Analyze a source file instead of chatting
    #[arg(long, value_name = "FILE")]
    pub analyze: Option<PathBuf>,

    /// Analysis focus used with --analyze
    #[arg(long, value_enum, default_value_t = ModeArg::Debug)]
    pub mode: ModeArg,

    /// Instruction for --mode custom
    #[arg(long, required_if_eq("mode", "custom"))]
    pub instruction: Option<String>,

    /// Explain a source file
    #[arg(long, value_name = "FILE")]
    pub explain: Option<PathBuf>,

    /// Store a fact in long-term memory
    #[arg(long, value_name = "FACT")]
    pub remember: Option<String>,

    /// Print the stored memory record
    #[arg(long, default_value_t = false)]
    pub show_memory: bool,

    /// Forget the stored context summary and facts
    #[arg(long, default_value_t = false)]
    pub clear_memory: bool,

    /// Path to the config file (defaults to ~/.config/jarvis/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Primary API key
    #[arg(long, env = "GROQ_API_KEY_1", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model for chat replies
    #[arg(long)]
    pub model: Option<String>,

    /// Print action URLs instead of opening them
    #[arg(long, default_value_t = false)]
    pub no_open: bool,

    /// Enable verbose output
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeArg {
    Debug,
    Optimize,
    Custom,
}

impl Args {
    /// Config values supplied on the command line
    pub fn config_overrides(&self) -> JarvisConfig {
        JarvisConfig {
            api_key: self.api_key.clone(),
            model_name: self.model.clone(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_custom_mode_requires_instruction() {
        let result = Args::try_parse_from(["jarvis", "--analyze", "main.rs", "--mode", "custom"]);
        assert!(result.is_err());

        let args = Args::try_parse_from([
            "jarvis",
            "--analyze",
            "main.rs",
            "--mode",
            "custom",
            "--instruction",
            "add tests",
        ])
        .unwrap();
        assert_eq!(args.mode, ModeArg::Custom);
        assert_eq!(args.instruction.as_deref(), Some("add tests"));
    }

    #[test]
    fn test_overrides_only_carry_flags() {
        let args = Args::try_parse_from(["jarvis", "--model", "llama-3.1-8b-instant", "hi"]).unwrap();
        let overrides = args.config_overrides();
        assert_eq!(overrides.model_name.as_deref(), Some("llama-3.1-8b-instant"));
        assert!(overrides.base_url.is_none());
        assert_eq!(args.prompt.as_deref(), Some("hi"));
    }
}
