use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Grade 0.0 marks a match the player took part in without receiving a grade.
pub const GRADE_UNRATED: f64 = 0.0;

/// Conceded goals cannot be attributed when the roster team slug matches
/// neither side of a historical match (mid-season transfer). Such records
/// carry this marker and stay out of the averages.
pub const CONCEDED_UNATTRIBUTABLE: f64 = 99.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub home_team: String,
    pub guest_team: String,
    pub end_score: String,
    pub halftime_score: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    #[serde(rename = "match")]
    pub game: Match,
    pub grade: f64,
    pub scp: u32,
    pub playtime: u32,
    pub sub_in: u32,
    pub sub_out: u32,
    pub top11: bool,
    pub conceded_goals: f64,
}

/// Season means for one player. Grade and conceded goals average only the
/// matches where the value carries information; scp and playtime follow the
/// spreadsheet convention of whole-number means.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Average {
    pub grade: f64,
    pub scp: u32,
    pub playtime: u32,
    pub top11: u32,
    pub conceded_goals: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub name: String,
    pub team: String,
    pub position: String,
    /// Name slug in kicker.de URLs, also the key the team-of-the-day pages use.
    pub kicker_name: String,
    /// Team slug in kicker.de URLs, compared against the match sides for
    /// conceded-goal attribution.
    pub kicker_team: String,
    #[serde(default)]
    pub matches: BTreeMap<u32, MatchRecord>,
    #[serde(default)]
    pub average: Average,
}

pub fn load_roster(path: &Path) -> Result<Vec<Player>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read roster {}", path.display()))?;
    let players: Vec<Player> = serde_json::from_str(&raw).context("parse roster json")?;
    Ok(players)
}
