//! # YAML Prompt Repository
//!
//! Day-keyed prompt content lives in `prompts.yaml`. Each day maps content
//! keys to scalars; a list value is joined into newline-separated lines.
//!
//! ```yaml
//! 2025-12-01:
//!   part1_prompt_1: Good morning!
//!   part2:
//!     - The riddle awaits.
//!     - Take your time.
//!   puzzle_format: text
//!   puzzle_prompt: What glows after the fire is out?
//!   puzzle_answer: ember
//! ```
//!
//! The file is authored by hand and never written by the store.

use anyhow::Result;
use chrono::NaiveDate;
use log::{debug, warn};
use serde_yaml::Value;
use std::collections::BTreeMap;

use super::connection::{CsvConnection, PROMPTS_FILE};
use crate::storage::{PromptContent, PromptStorage};

#[derive(Clone)]
pub struct PromptRepository {
    connection: CsvConnection,
}

impl PromptRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_prompts(&self) -> Result<BTreeMap<String, BTreeMap<String, Value>>> {
        let prompts = self.connection.read_yaml(PROMPTS_FILE)?;
        if prompts.is_none() {
            debug!("No prompts file at {:?}", self.connection.file_path(PROMPTS_FILE));
        }
        Ok(prompts.unwrap_or_default())
    }
}

/// Flatten a YAML value into the string form prompt content uses
fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::String(text) => Some(text.clone()),
        Value::Sequence(items) => {
            let lines: Vec<String> = items.iter().filter_map(value_to_string).collect();
            Some(lines.join("\n"))
        }
        Value::Mapping(_) | Value::Tagged(_) => None,
    }
}

impl PromptStorage for PromptRepository {
    fn prompt_for(&self, day: NaiveDate) -> Result<Option<PromptContent>> {
        let prompts = self.read_prompts()?;
        let key = day.format("%Y-%m-%d").to_string();

        let raw = match prompts.get(&key) {
            Some(raw) => raw,
            None => return Ok(None),
        };

        let mut content = PromptContent::new();
        for (field, value) in raw {
            match value_to_string(value) {
                Some(text) => {
                    content.insert(field.clone(), text);
                }
                None => warn!("Ignoring nested prompt field '{}' for {}", field, key),
            }
        }
        Ok(Some(content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::TestEnvironment;
    use std::fs;

    #[test]
    fn test_missing_file_means_no_content() {
        let env = TestEnvironment::new().unwrap();
        let repo = PromptRepository::new(env.connection.clone());
        let day = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
        assert!(repo.prompt_for(day).unwrap().is_none());
    }

    #[test]
    fn test_scalars_and_lists_are_flattened() {
        let env = TestEnvironment::new().unwrap();
        fs::write(
            env.connection.file_path(PROMPTS_FILE),
            "2025-12-01:\n  part1_prompt_1: Hello\n  part2:\n    - First\n    - Second\n  puzzle_answer: 42\n  puzzle_format: button\n",
        )
        .unwrap();

        let repo = PromptRepository::new(env.connection.clone());
        let content = repo
            .prompt_for(NaiveDate::from_ymd_opt(2025, 12, 1).unwrap())
            .unwrap()
            .expect("content for the day");

        assert_eq!(content["part1_prompt_1"], "Hello");
        assert_eq!(content["part2"], "First\nSecond");
        assert_eq!(content["puzzle_answer"], "42");
        assert_eq!(content["puzzle_format"], "button");
        assert!(repo
            .prompt_for(NaiveDate::from_ymd_opt(2025, 12, 2).unwrap())
            .unwrap()
            .is_none());
    }
}
