use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::SeasonConfig;
use crate::roster::{Average, CONCEDED_UNATTRIBUTABLE, GRADE_UNRATED, MatchRecord, Player};

const NO_DATA: &str = "-";
const GROUP_COLUMNS: [&str; 5] = ["Note", "SCP", "Spielzeit", "11 des Tages", "Gegentore"];

/// Full record set plus averages, pretty-printed for the chart and report
/// consumers. Sentinel values are written as-is so a re-import sees exactly
/// the state the crawl produced.
pub fn write_player_data(path: &Path, players: &[Player]) -> Result<()> {
    let json = serde_json::to_string_pretty(players).context("serialize player data")?;
    write_atomic(path, json.as_bytes())
}

pub fn load_player_data(path: &Path) -> Result<Vec<Player>> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&raw).context("parse player data json")
}

/// Spreadsheet layout: one column group per player (Note, SCP, Spielzeit,
/// 11 des Tages, Gegentore), one row per matchday, summary row last. The
/// three no-data states — ungraded, unattributable, absent matchday — are
/// rendered as dashes, never as zeros.
pub fn write_player_csv(path: &Path, players: &[Player], cfg: &SeasonConfig) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;

    let mut header = vec![String::new()];
    let mut subheader = vec![String::new()];
    for player in players {
        header.extend([
            player.name.clone(),
            player.team.clone(),
            player.position.clone(),
            String::new(),
            String::new(),
        ]);
        subheader.extend(GROUP_COLUMNS.iter().map(|col| col.to_string()));
    }
    writer.write_record(&header)?;
    writer.write_record(&subheader)?;

    for matchday in 1..=cfg.matchdays {
        let mut row = vec![matchday.to_string()];
        for player in players {
            match player.matches.get(&matchday) {
                Some(record) => row.extend(record_cells(record)),
                None => row.extend(std::iter::repeat_n(NO_DATA.to_string(), GROUP_COLUMNS.len())),
            }
        }
        writer.write_record(&row)?;
    }

    let mut summary = vec!["Summary".to_string()];
    for player in players {
        summary.extend(average_cells(&player.average));
    }
    writer.write_record(&summary)?;

    writer.flush().context("flush csv")?;
    Ok(())
}

fn record_cells(record: &MatchRecord) -> Vec<String> {
    vec![
        fmt_grade(record.grade),
        record.scp.to_string(),
        record.playtime.to_string(),
        record.top11.to_string(),
        fmt_conceded(record.conceded_goals),
    ]
}

fn average_cells(avg: &Average) -> Vec<String> {
    vec![
        format!("{:.2}", avg.grade),
        avg.scp.to_string(),
        avg.playtime.to_string(),
        avg.top11.to_string(),
        format!("{:.2}", avg.conceded_goals),
    ]
}

// 0.0 is "not graded", not a score.
fn fmt_grade(grade: f64) -> String {
    if grade == GRADE_UNRATED {
        NO_DATA.to_string()
    } else {
        format!("{grade:.1}")
    }
}

fn fmt_conceded(conceded: f64) -> String {
    if conceded == CONCEDED_UNATTRIBUTABLE {
        NO_DATA.to_string()
    } else {
        format!("{conceded:.2}")
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            let _ = fs::create_dir_all(dir);
        }
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("swap {}", path.display()))?;
    Ok(())
}
