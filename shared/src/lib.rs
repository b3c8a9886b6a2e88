use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a single calendar day sits in its three-stage progression.
///
/// The stage is derived from the day's star count:
/// 0 stars → `Part1`, 1 star → `Part2`, 2 stars → `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckInStage {
    /// Not checked in yet
    Part1,
    /// Checked in, riddle still open
    Part2,
    /// Riddle solved
    Done,
}

impl CheckInStage {
    /// Map a stored star count onto a stage. Counts above 2 are treated as done.
    pub fn from_stars(stars: u8) -> Self {
        match stars {
            0 => CheckInStage::Part1,
            1 => CheckInStage::Part2,
            _ => CheckInStage::Done,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckInStage::Part1 => "part1",
            CheckInStage::Part2 => "part2",
            CheckInStage::Done => "done",
        }
    }
}

impl fmt::Display for CheckInStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a day's riddle is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PuzzleFormat {
    /// A typed answer compared against the configured one
    #[default]
    Text,
    /// A single acknowledgement button; any click solves it
    Button,
}

impl PuzzleFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            PuzzleFormat::Text => "text",
            PuzzleFormat::Button => "button",
        }
    }
}

impl fmt::Display for PuzzleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PuzzleFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "text" => Ok(PuzzleFormat::Text),
            "button" => Ok(PuzzleFormat::Button),
            other => Err(format!("Unknown puzzle format: {}", other)),
        }
    }
}

/// Display view of an awarded voucher with its derived flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoucherSummary {
    /// Identifier in `voucher-NNNN` form
    pub id: String,
    pub title: String,
    pub details: String,
    /// When the voucher was drawn (RFC 3339)
    pub awarded_at: String,
    /// First day the voucher may be redeemed (YYYY-MM-DD), if locked
    pub redeemable_at: Option<String>,
    /// When the voucher was redeemed (RFC 3339)
    pub redeemed_at: Option<String>,
    pub redeemed: bool,
    pub redeemable: bool,
}

/// Star totals and lottery progress across the whole season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardProgress {
    pub total_stars: u32,
    pub draws_unlocked: u32,
    pub draws_claimed: u32,
    pub draws_available: u32,
    pub next_milestone: Option<u32>,
    pub stars_until_next_milestone: Option<u32>,
    pub voucher_milestones: Vec<u32>,
}

/// Snapshot of one day for the calendar page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayStatus {
    /// Calendar date (YYYY-MM-DD)
    pub day: String,
    pub stars: u8,
    pub stage: CheckInStage,
    pub total_stars: u32,
    pub total_check_ins: u32,
    /// Days until the season ends; negative once it is over
    pub days_left: i64,
}

/// Narrative content for one day, grouped by audience state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PromptView {
    pub part1: Vec<String>,
    pub part2: Vec<String>,
    pub done: Vec<String>,
    pub story: Vec<String>,
    pub puzzle_prompt: String,
    pub puzzle_format: PuzzleFormat,
}
