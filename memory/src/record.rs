use serde::Serialize;

/// Long-lived memory carried across sessions: one rolling context summary
/// and a duplicate-free list of facts about the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MemoryRecord {
    pub context: Option<String>,
    facts: Vec<String>,
}

impl MemoryRecord {
    pub fn new(context: Option<String>, facts: impl IntoIterator<Item = String>) -> Self {
        let mut record = Self {
            context: context.filter(|c| !c.is_empty()),
            facts: Vec::new(),
        };
        for fact in facts {
            record.add_fact(fact);
        }
        record
    }

    pub fn facts(&self) -> &[String] {
        &self.facts
    }

    /// Adds a fact unless an identical one is already present.
    /// Returns whether the fact was added.
    pub fn add_fact(&mut self, fact: impl Into<String>) -> bool {
        let fact = fact.into();
        if self.facts.contains(&fact) {
            return false;
        }
        self.facts.push(fact);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.context.is_none() && self.facts.is_empty()
    }

    /// Formats the record for injection into a system prompt.
    ///
    /// Returns an empty string when there is nothing to remember.
    pub fn render(&self) -> String {
        let mut rendered = String::new();

        if let Some(context) = &self.context {
            rendered.push_str("\nPREVIOUS CONTEXT SUMMARY:\n");
            rendered.push_str(context);
            rendered.push('\n');
        }

        if !self.facts.is_empty() {
            let bullets = self
                .facts
                .iter()
                .map(|f| format!("- {}", f))
                .collect::<Vec<_>>()
                .join("\n");
            rendered.push_str("\nKNOWN FACTS:\n");
            rendered.push_str(&bullets);
            rendered.push('\n');
        }

        rendered
    }
}
