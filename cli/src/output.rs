use colored::*;
use jarvis_memory::MemoryRecord;
use jarvis_orchestrator::{Message, SessionStats};

/// Print an assistant message to the terminal
pub fn print_reply(message: &Message) {
    if message.is_error {
        println!("{}: {}", "J.A.R.V.I.S".red().bold(), message.content.red());
    } else {
        println!("{}: {}", "J.A.R.V.I.S".blue().bold(), message.content);
    }
}

/// Print the URL an action opened
pub fn print_action(url: &str, opened: bool) {
    let verb = if opened { "Opened" } else { "Open" };
    println!("{} {}", format!("{}:", verb).yellow(), url.underline());
}

/// One-line status shown after each interactive turn
pub fn format_stats(stats: &SessionStats) -> String {
    match stats.last_latency {
        Some(latency) => format!(
            "[replies: {} | latency: {}ms]",
            stats.generations,
            latency.as_millis()
        ),
        None => format!("[replies: {}]", stats.generations),
    }
}

/// Print the stored memory record
pub fn print_memory(record: &MemoryRecord) {
    if record.is_empty() {
        println!("{}", "Memory archive is empty.".dimmed());
        return;
    }

    println!("{}", "Context summary:".cyan().bold());
    println!("  {}", record.context.as_deref().unwrap_or("(none)"));
    println!("{}", "Known facts:".cyan().bold());
    if record.facts().is_empty() {
        println!("  (none)");
    }
    for fact in record.facts() {
        println!("  - {}", fact);
    }
}

/// Show usage instructions when no prompt or action is provided
pub fn print_usage_instructions() {
    println!("{}", "Usage:".yellow().bold());
    println!("  {}", "jarvis \"your prompt\"".green().bold());
    println!("    Send a single message");
    println!();
    println!("  {}", "jarvis -i".green().bold());
    println!("    Start an interactive chat session");
    println!();
    println!("  {}", "jarvis --analyze main.rs --mode optimize".green().bold());
    println!("    Ask for a code review of a file");
    println!();
    println!("{}", "Options:".cyan());
    println!("  --remember <FACT>   Store a fact in long-term memory");
    println!("  --show-memory       Print the memory archive");
    println!("  --clear-memory      Forget everything");
    println!("  --no-open           Print action URLs instead of opening them");
    println!("  --help              Show all options");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_format_stats() {
        let mut stats = SessionStats::default();
        assert_eq!(format_stats(&stats), "[replies: 0]");

        stats.generations = 3;
        stats.last_latency = Some(Duration::from_millis(842));
        assert_eq!(format_stats(&stats), "[replies: 3 | latency: 842ms]");
    }
}
