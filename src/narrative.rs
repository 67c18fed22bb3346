use crate::refs::ReferenceStore;

/// Duration used when no script is loaded and no minutes were given.
pub const DEFAULT_MINUTES: u32 = 1;

/// The effective narrative input: freeform scenario text or an uploaded
/// script, never both. A script overrides manual duration (it is derived
/// from word count instead).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NarrativeInput {
    Scenario(String),
    Script(String),
}

impl NarrativeInput {
    pub fn text(&self) -> &str {
        match self {
            NarrativeInput::Scenario(t) | NarrativeInput::Script(t) => t,
        }
    }

    pub fn is_script(&self) -> bool {
        matches!(self, NarrativeInput::Script(_))
    }
}

/// Whitespace-delimited word count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Minutes derived from a script at the configured reading speed, minimum 1.
pub fn derived_minutes(script: &str, reading_wpm: u32) -> u32 {
    let words = word_count(script) as u32;
    words.div_ceil(reading_wpm.max(1)).max(1)
}

/// Resolve the effective duration: derived for scripts, manual (or the
/// default) for scenarios.
pub fn effective_minutes(input: &NarrativeInput, manual: Option<u32>, reading_wpm: u32) -> u32 {
    match input {
        NarrativeInput::Script(script) => derived_minutes(script, reading_wpm),
        NarrativeInput::Scenario(_) => manual.unwrap_or(DEFAULT_MINUTES),
    }
}

/// Gate for plan generation: exactly 3 reference images, a non-empty
/// narrative, and a positive duration.
pub fn can_build_plan(refs: &ReferenceStore, input: Option<&NarrativeInput>, minutes: u32) -> bool {
    refs.is_complete()
        && input.is_some_and(|i| !i.text().trim().is_empty())
        && minutes > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn full_store() -> ReferenceStore {
        let dir = tempfile::tempdir().unwrap();
        let paths: Vec<PathBuf> = (1..=3)
            .map(|i| {
                let p = dir.path().join(format!("r{i}.png"));
                std::fs::write(&p, b"img").unwrap();
                p
            })
            .collect();
        let mut store = ReferenceStore::new();
        store.add_images(&paths).unwrap();
        store
    }

    #[test]
    fn test_word_count_whitespace_delimited() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   "), 0);
        assert_eq!(word_count("one"), 1);
        assert_eq!(word_count("one two\tthree\nfour"), 4);
    }

    #[test]
    fn test_derived_minutes_rounds_up() {
        // 150 words per minute
        assert_eq!(derived_minutes(&"w ".repeat(150), 150), 1);
        assert_eq!(derived_minutes(&"w ".repeat(151), 150), 2);
        assert_eq!(derived_minutes(&"w ".repeat(300), 150), 2);
        assert_eq!(derived_minutes(&"w ".repeat(301), 150), 3);
    }

    #[test]
    fn test_derived_minutes_minimum_one() {
        assert_eq!(derived_minutes("", 150), 1);
        assert_eq!(derived_minutes("a few words only", 150), 1);
    }

    #[test]
    fn test_effective_minutes_script_ignores_manual() {
        let input = NarrativeInput::Script("w ".repeat(400));
        assert_eq!(effective_minutes(&input, Some(10), 150), 3);
    }

    #[test]
    fn test_effective_minutes_scenario_manual_or_default() {
        let input = NarrativeInput::Scenario("a tribe discovers fire".into());
        assert_eq!(effective_minutes(&input, Some(5), 150), 5);
        assert_eq!(effective_minutes(&input, None, 150), DEFAULT_MINUTES);
    }

    #[test]
    fn test_can_build_plan_requires_all_conditions() {
        let store = full_store();
        let input = NarrativeInput::Scenario("a tribe discovers fire".into());
        assert!(can_build_plan(&store, Some(&input), 1));

        // Missing narrative
        assert!(!can_build_plan(&store, None, 1));
        let blank = NarrativeInput::Scenario("   ".into());
        assert!(!can_build_plan(&store, Some(&blank), 1));

        // Zero duration
        assert!(!can_build_plan(&store, Some(&input), 0));

        // Wrong ref count
        let empty = ReferenceStore::new();
        assert!(!can_build_plan(&empty, Some(&input), 1));
    }
}
