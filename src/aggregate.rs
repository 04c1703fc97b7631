use std::collections::BTreeMap;

use anyhow::{Result, bail};

use crate::roster::{Average, CONCEDED_UNATTRIBUTABLE, GRADE_UNRATED, MatchRecord, Player};

/// Season means over one player's record collection. Ungraded matches stay
/// in the scp/playtime denominators but out of the grade denominator, and
/// unattributable conceded-goal values stay out of that mean entirely.
pub fn player_average(matches: &BTreeMap<u32, MatchRecord>) -> Result<Average> {
    if matches.is_empty() {
        bail!("no match data");
    }
    let total = matches.len() as u32;

    let mut grade_sum = 0.0;
    let mut graded = 0u32;
    let mut scp_sum = 0u32;
    let mut playtime_sum = 0u32;
    let mut top11 = 0u32;
    let mut conceded_sum = 0.0;
    let mut attributable = 0u32;

    for record in matches.values() {
        scp_sum += record.scp;
        playtime_sum += record.playtime;
        if record.grade != GRADE_UNRATED {
            grade_sum += record.grade;
            graded += 1;
        }
        if record.top11 {
            top11 += 1;
        }
        if record.conceded_goals != CONCEDED_UNATTRIBUTABLE {
            conceded_sum += record.conceded_goals;
            attributable += 1;
        }
    }

    Ok(Average {
        grade: if graded == 0 {
            0.0
        } else {
            grade_sum / graded as f64
        },
        scp: scp_sum / total,
        playtime: playtime_sum / total,
        top11,
        conceded_goals: if attributable == 0 {
            0.0
        } else {
            conceded_sum / attributable as f64
        },
    })
}

/// Fill in every roster player's average after both crawls and the merge
/// have run. Players without any records keep the zeroed default.
pub fn compute_averages(players: &mut [Player]) {
    for player in players.iter_mut() {
        match player_average(&player.matches) {
            Ok(avg) => player.average = avg,
            Err(err) => log::info!("{}: {err}", player.name),
        }
    }
}
