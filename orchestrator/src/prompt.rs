use chrono::{DateTime, Local};
use jarvis_memory::MemoryRecord;

/// Instruction for the intent classifier
pub const CLASSIFIER_PROMPT: &str = "You are an Intent Classifier. Analyze the user's request.
- If the user wants to open a specific website, return {\"action\": \"OPEN_URL\", \"payload\": \"https://...\"} with an absolute URL.
- If the user asks to search for something (e.g. \"google this\", \"search for\", \"find info on\"), return {\"action\": \"SEARCH_WEB\", \"payload\": \"<search query>\"}.
- For a joke, code, chat, or a general question, return {\"action\": \"NONE\"}.
- Output ONLY valid JSON.";

/// Instruction for the transcript summarizer
pub const SUMMARIZER_PROMPT: &str = "Summarize the following conversation into a concise 'Persistent Context' string. \
Focus on key user facts and current topics. Return only the summary text.";

const PERSONA: &str = "You are J.A.R.V.I.S. (Just A Rather Very Intelligent System), an advanced AI engineer and software architect.

CODING PROTOCOLS:
1. Engineering Excellence: write production-grade, optimized and secure code. No placeholders unless explicitly requested.
2. Clean Code: apply SOLID, DRY and design patterns suited to the task.
3. Multi-Language Mastery: Python, JavaScript/React, C++, Rust, Go and low-level assembly.
4. Performance First: consider time and space complexity and suggest optimizations.
5. Security: sanitize inputs, avoid injection, follow OWASP guidance.
6. Architecture: give high-level architectural insight when asked for systems.

PERSONA GUIDELINES:
- Tone: witty, sophisticated, technical and slightly protective.
- Communication: be precise. Explain why before how when the architecture is complex.
- Formatting: use Markdown with language tags on code blocks and bold for critical variables.";

/// Wall-clock line injected into the system prompt
pub fn time_context(now: &DateTime<Local>) -> String {
    format!(
        "SYSTEM TIME: {} | DATE: {}",
        now.format("%H:%M:%S"),
        now.format("%Y-%m-%d")
    )
}

/// Builds the generator's system instruction from the persona, the current
/// time and the rendered memory record
pub fn build_system_prompt(memory: &MemoryRecord, now: &DateTime<Local>) -> String {
    format!(
        "{}\n\n{}\nMEMORY ARCHIVE: {}\n\nRespond as the Master AI Engineer.",
        PERSONA,
        time_context(now),
        memory.render()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap()
    }

    #[test]
    fn test_time_context_format() {
        assert_eq!(
            time_context(&fixed_now()),
            "SYSTEM TIME: 09:26:53 | DATE: 2026-03-14"
        );
    }

    #[test]
    fn test_system_prompt_layout() {
        let memory = MemoryRecord::new(
            Some("Working on a tokio service.".to_string()),
            vec!["Name is Pepper".to_string()],
        );
        let prompt = build_system_prompt(&memory, &fixed_now());

        assert!(prompt.starts_with("You are J.A.R.V.I.S."));
        let time_at = prompt.find("SYSTEM TIME: 09:26:53").unwrap();
        let archive_at = prompt.find("MEMORY ARCHIVE:").unwrap();
        let summary_at = prompt.find("PREVIOUS CONTEXT SUMMARY:\nWorking on a tokio service.").unwrap();
        let facts_at = prompt.find("KNOWN FACTS:\n- Name is Pepper").unwrap();
        assert!(time_at < archive_at && archive_at < summary_at && summary_at < facts_at);
    }

    #[test]
    fn test_system_prompt_with_empty_memory() {
        let prompt = build_system_prompt(&MemoryRecord::default(), &fixed_now());
        assert!(prompt.contains("MEMORY ARCHIVE: \n"));
        assert!(!prompt.contains("KNOWN FACTS"));
        assert!(!prompt.contains("PREVIOUS CONTEXT SUMMARY"));
    }
}
