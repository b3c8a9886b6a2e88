//! Per-day narrative content and the riddle answer check.
//!
//! Content is a flat string map authored per day. Prompt lines come in four
//! groups (`part1`, `part2`, `done`, `story`), written either as numbered
//! keys (`part1_1`, `part1_2`, ...) or as one multi-line `part1` value.

use chrono::NaiveDate;
use log::debug;
use shared::{PromptView, PuzzleFormat};

use super::errors::{AdventError, AdventResult};
use crate::storage::{AdventStore, PromptContent};

/// Configured answer that accepts any attempt
pub const WILDCARD_ANSWER: &str = "*";

const PUZZLE_ANSWER_KEY: &str = "puzzle_answer";
const PUZZLE_FORMAT_KEY: &str = "puzzle_format";
const PUZZLE_PROMPT_KEY: &str = "puzzle_prompt";

#[derive(Debug, Clone)]
pub struct PromptService {
    day: NaiveDate,
    content: PromptContent,
    /// Answer stored on the day record, used when content carries none
    stored_answer: Option<String>,
}

impl PromptService {
    /// Load the content for `day`. Missing content is an authoring bug and fails.
    pub fn for_day(store: &dyn AdventStore, day: NaiveDate) -> AdventResult<Self> {
        let content = store
            .prompt_for(day)?
            .ok_or(AdventError::MissingPrompt { day })?;

        let stored_answer = if content.contains_key(PUZZLE_ANSWER_KEY) {
            None
        } else {
            store.fetch_day(day)?.and_then(|record| record.puzzle_answer)
        };

        Ok(Self::from_content(day, content, stored_answer))
    }

    pub fn from_content(day: NaiveDate, content: PromptContent, stored_answer: Option<String>) -> Self {
        Self {
            day,
            content,
            stored_answer,
        }
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    pub fn part1_prompts(&self) -> Vec<String> {
        self.lines_for("part1")
    }

    pub fn part2_prompts(&self) -> Vec<String> {
        self.lines_for("part2")
    }

    pub fn done_prompts(&self) -> Vec<String> {
        self.lines_for("done")
    }

    pub fn story_lines(&self) -> Vec<String> {
        self.lines_for("story")
    }

    pub fn puzzle_prompt(&self) -> String {
        self.fetch_string(PUZZLE_PROMPT_KEY)
    }

    /// Missing or blank means `text`.
    pub fn puzzle_format(&self) -> AdventResult<PuzzleFormat> {
        let raw = self.fetch_string(PUZZLE_FORMAT_KEY);
        raw.parse().map_err(|_| AdventError::UnknownPuzzleFormat {
            day: self.day,
            value: raw,
        })
    }

    /// The expected answer, trimmed
    pub fn puzzle_answer(&self) -> String {
        match self.content.get(PUZZLE_ANSWER_KEY) {
            Some(answer) => answer.trim().to_string(),
            None => self
                .stored_answer
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
        }
    }

    /// Whether `attempt` solves the day's riddle.
    ///
    /// Button days accept anything. A blank or `*` answer accepts any
    /// non-blank attempt. Otherwise the trimmed attempt must equal the
    /// answer under full Unicode case folding.
    pub fn matches(&self, attempt: &str) -> AdventResult<bool> {
        if self.puzzle_format()? == PuzzleFormat::Button {
            return Ok(true);
        }

        let attempt = attempt.trim();
        let answer = self.puzzle_answer();
        if answer.is_empty() || answer == WILDCARD_ANSWER {
            return Ok(!attempt.is_empty());
        }

        Ok(caseless::default_caseless_match_str(attempt, &answer))
    }

    pub fn to_view(&self) -> AdventResult<PromptView> {
        Ok(PromptView {
            part1: self.part1_prompts(),
            part2: self.part2_prompts(),
            done: self.done_prompts(),
            story: self.story_lines(),
            puzzle_prompt: self.puzzle_prompt(),
            puzzle_format: self.puzzle_format()?,
        })
    }

    fn fetch_string(&self, key: &str) -> String {
        self.content
            .get(key)
            .map(|value| value.trim().to_string())
            .unwrap_or_default()
    }

    fn lines_for(&self, group: &str) -> Vec<String> {
        let numbered = self.numbered_lines(group);
        if !numbered.is_empty() {
            return numbered;
        }
        debug!("No numbered '{}' lines for {}, reading block value", group, self.day);
        self.block_lines(group)
    }

    fn numbered_lines(&self, group: &str) -> Vec<String> {
        let prefix = format!("{}_", group);
        let mut keys: Vec<(u32, &String)> = self
            .content
            .keys()
            .filter_map(|key| key.strip_prefix(&prefix).map(|suffix| (line_index(suffix), key)))
            .collect();
        keys.sort();

        keys.into_iter()
            .map(|(_, key)| self.fetch_string(key))
            .filter(|line| !line.is_empty())
            .collect()
    }

    fn block_lines(&self, group: &str) -> Vec<String> {
        self.fetch_string(group)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// First run of digits in a key suffix, or 0 when there is none
fn line_index(suffix: &str) -> u32 {
    let digits: String = suffix
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::DayRecord;
    use crate::storage::{DayStorage, MemoryStore};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 3).unwrap()
    }

    fn content(pairs: &[(&str, &str)]) -> PromptContent {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn prompt(pairs: &[(&str, &str)]) -> PromptService {
        PromptService::from_content(day(), content(pairs), None)
    }

    fn prompt_with_answer(answer: &str) -> PromptService {
        prompt(&[("puzzle_answer", answer)])
    }

    #[test]
    fn test_missing_content_fails_loudly() {
        let store = MemoryStore::new();
        let err = PromptService::for_day(&store, day()).unwrap_err();
        assert!(matches!(err, AdventError::MissingPrompt { .. }));
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_answer_is_case_insensitive_and_trimmed() {
        let prompt = prompt(&[("puzzle_answer", " Ember ")]);
        assert_eq!(prompt.puzzle_answer(), "Ember");
        assert!(prompt.matches("ember").unwrap());
        assert!(prompt.matches("  EMBER\n").unwrap());
        assert!(!prompt.matches("embers").unwrap());
    }

    #[test]
    fn test_unicode_case_folding() {
        let prompt = prompt(&[("puzzle_answer", "Ärger")]);
        assert!(prompt.matches("ärger").unwrap());
        assert!(prompt.matches("ÄRGER").unwrap());

        let prompt = prompt_with_answer("STRASSE");
        assert!(prompt.matches("straße").unwrap());
        assert!(prompt.matches("Strasse").unwrap());
        assert!(!prompt.matches("strase").unwrap());

        let prompt = prompt_with_answer("Straße");
        assert!(prompt.matches("STRASSE").unwrap());
    }

    #[test]
    fn test_wildcard_answers_accept_any_non_blank_attempt() {
        for answer in ["", "*", " * "] {
            let prompt = prompt(&[("puzzle_answer", answer)]);
            assert!(prompt.matches("anything").unwrap());
            assert!(!prompt.matches("   ").unwrap());
        }
    }

    #[test]
    fn test_button_days_accept_anything() {
        let prompt = prompt(&[("puzzle_format", "Button"), ("puzzle_answer", "ember")]);
        assert_eq!(prompt.puzzle_format().unwrap(), PuzzleFormat::Button);
        assert!(prompt.matches("").unwrap());
        assert!(prompt.matches("wrong").unwrap());
    }

    #[test]
    fn test_unknown_puzzle_format_is_configuration_error() {
        let prompt = prompt(&[("puzzle_format", "dance"), ("puzzle_answer", "ember")]);
        let err = prompt.matches("ember").unwrap_err();
        assert!(matches!(err, AdventError::UnknownPuzzleFormat { ref value, .. } if value == "dance"));
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_numbered_lines_sort_numerically() {
        let prompt = prompt(&[
            ("part1_10", "ten"),
            ("part1_2", "two"),
            ("part1_1", " one "),
            ("part1_3", "   "),
            ("part1", "ignored block"),
        ]);
        assert_eq!(prompt.part1_prompts(), vec!["one", "two", "ten"]);
    }

    #[test]
    fn test_block_lines_split_on_newlines() {
        let prompt = prompt(&[("done", "Well done!\r\n\n  See you tomorrow.  ")]);
        assert_eq!(prompt.done_prompts(), vec!["Well done!", "See you tomorrow."]);
        assert!(prompt.story_lines().is_empty());
    }

    #[test]
    fn test_stored_answer_is_used_when_content_has_none() {
        let mut record = DayRecord::new(day());
        record.puzzle_answer = Some("Ember".to_string());
        let store = MemoryStore::new().with_prompt(day(), content(&[("puzzle_prompt", "What glows?")]));
        store.write_day(&record).unwrap();

        let prompt = PromptService::for_day(&store, day()).unwrap();
        assert_eq!(prompt.puzzle_answer(), "Ember");
        assert!(prompt.matches("ember").unwrap());

        let view = prompt.to_view().unwrap();
        assert_eq!(view.puzzle_prompt, "What glows?");
        assert_eq!(view.puzzle_format, PuzzleFormat::Text);
    }
}
