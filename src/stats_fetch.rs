use std::collections::BTreeMap;

use anyhow::{Context, Result, anyhow};
use once_cell::sync::Lazy;
use rayon::prelude::*;
use reqwest::blocking::Client;
use scraper::{ElementRef, Html, Selector};

use crate::config::SeasonConfig;
use crate::http_client::{fetch_html, http_client, with_fetch_pool};
use crate::roster::{CONCEDED_UNATTRIBUTABLE, GRADE_UNRATED, Match, MatchRecord, Player};

const KICKER_BASE: &str = "https://www.kicker.de";
const FULL_MATCH_MINUTES: u32 = 90;
const NO_SQUAD_TEXT: &str = "ohne Einsatz im Kader";

// Column ordinals and element paths mirror the kicker.de vita statistics
// table and have to be revisited whenever the upstream markup changes.
static STATS_ROOT: Lazy<Selector> = Lazy::new(|| sel("div.kick__vita__statistic"));
static SEASON_OPTION: Lazy<Selector> = Lazy::new(|| sel("option[selected=selected]"));
static ROW: Lazy<Selector> = Lazy::new(|| sel("tr"));
static FIRST_CELL: Lazy<Selector> = Lazy::new(|| sel("td:nth-child(1)"));
static NO_SQUAD_CELL: Lazy<Selector> =
    Lazy::new(|| sel("td.kick__vita__statistic--table-second_noplay"));
static MATCHDAY_INFO: Lazy<Selector> =
    Lazy::new(|| sel("div.kick__vita__statistic--table-second_dateinfo"));
static TEAM_LINK: Lazy<Selector> = Lazy::new(|| sel("a.kick__v100-gameCell__team"));
static SCORE: Lazy<Selector> = Lazy::new(|| sel("div.kick__v100-scoreBoard__scoreHolder__score"));
static GRADE_CELL: Lazy<Selector> = Lazy::new(|| sel("td:nth-child(2)"));
static SCP_CELL: Lazy<Selector> = Lazy::new(|| sel("td:nth-child(6)"));
static SUB_IN_CELL: Lazy<Selector> = Lazy::new(|| sel("td:nth-child(7)"));
static SUB_OUT_CELL: Lazy<Selector> = Lazy::new(|| sel("td:nth-child(8)"));

fn sel(css: &str) -> Selector {
    Selector::parse(css).expect("selector parses")
}

pub struct StatsCrawl {
    pub errors: Vec<String>,
}

/// Crawl every roster player's statistics page on the shared fetch pool.
/// Each task holds the mutable borrow of exactly one player, so record
/// collections are written without locking; the pool join is the only
/// synchronization point. A failed page leaves that player empty and is
/// reported in `errors` rather than aborting the crawl.
pub fn fetch_player_stats(players: &mut [Player], cfg: &SeasonConfig) -> StatsCrawl {
    let client = match http_client() {
        Ok(client) => client,
        Err(err) => {
            return StatsCrawl {
                errors: vec![format!("stats client build failed: {err}")],
            };
        }
    };

    let errors: Vec<String> = with_fetch_pool(|| {
        players
            .par_iter_mut()
            .filter_map(|player| {
                scrape_player(client, player, cfg)
                    .err()
                    .map(|err| format!("{} ({}): {err}", player.name, player.kicker_name))
            })
            .collect()
    });

    StatsCrawl { errors }
}

fn scrape_player(client: &Client, player: &mut Player, cfg: &SeasonConfig) -> Result<()> {
    let url = player_page_url(player, cfg);
    log::info!("visiting {url}");
    let html = fetch_html(client, &url).context("player page fetch failed")?;
    let records = parse_player_page(&html, player, cfg)?;
    player.matches = records;
    Ok(())
}

pub fn player_page_url(player: &Player, cfg: &SeasonConfig) -> String {
    format!(
        "{KICKER_BASE}/{}/spieler/bundesliga/{}/{}",
        player.kicker_name, cfg.season_path, player.kicker_team
    )
}

/// Walk the season statistics table and collect the player's matchday rows.
/// Returns an empty map when the page shows a different season than the one
/// configured.
pub fn parse_player_page(
    html: &str,
    player: &Player,
    cfg: &SeasonConfig,
) -> Result<BTreeMap<u32, MatchRecord>> {
    let doc = Html::parse_document(html);
    let root = doc
        .select(&STATS_ROOT)
        .next()
        .context("statistics section not found")?;

    let mut records = BTreeMap::new();

    let season = root
        .select(&SEASON_OPTION)
        .next()
        .map(element_text)
        .unwrap_or_default();
    if season != cfg.season_label {
        log::warn!(
            "no {} data for {} yet (page shows {season:?})",
            cfg.season_label,
            player.name
        );
        return Ok(records);
    }

    let mut in_section = false;
    for row in root.select(&ROW) {
        let first_cell = cell_text(row, &FIRST_CELL);
        let no_squad = cell_text(row, &NO_SQUAD_CELL) == NO_SQUAD_TEXT;
        match classify_row(&first_cell, no_squad, &mut in_section, cfg) {
            RowClass::SectionStart | RowClass::Skip => continue,
            RowClass::Stop => break,
            RowClass::InScope => {}
        }
        match parse_match_row(row, &player.kicker_team) {
            // first extraction for a matchday wins
            Ok((matchday, record)) => {
                records.entry(matchday).or_insert(record);
            }
            Err(err) => log::warn!("{}: dropping row: {err}", player.name),
        }
    }

    Ok(records)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowClass {
    SectionStart,
    InScope,
    Skip,
    Stop,
}

/// Decide how one table row advances the scan. `in_section` is owned by the
/// caller and carried across the rows of one page; rows ahead of the
/// competition header and rows without a squad appearance are skipped, the
/// first non-matchday row after the header ends the iteration.
pub fn classify_row(
    first_cell: &str,
    no_squad: bool,
    in_section: &mut bool,
    cfg: &SeasonConfig,
) -> RowClass {
    if first_cell == cfg.competition {
        *in_section = true;
        return RowClass::SectionStart;
    }
    if !*in_section || first_cell.is_empty() || no_squad {
        return RowClass::Skip;
    }
    if !first_cell.contains(&cfg.matchday_marker) {
        return RowClass::Stop;
    }
    RowClass::InScope
}

/// Extract one in-scope row into its matchday key and record. Only the
/// matchday number, the two team links and the score tokens are required;
/// every other field degrades to its fallback.
pub fn parse_match_row(row: ElementRef, team: &str) -> Result<(u32, MatchRecord)> {
    let matchday = parse_matchday(&cell_text(row, &MATCHDAY_INFO))?;

    let mut slugs = row.select(&TEAM_LINK).filter_map(team_slug);
    let home_team = slugs.next().context("home team link missing")?;
    let guest_team = slugs.next().context("guest team link missing")?;

    let scores: Vec<String> = row.select(&SCORE).map(element_text).collect();
    if scores.len() < 4 {
        return Err(anyhow!("expected 4 score tokens, found {}", scores.len()));
    }
    let game = Match {
        home_team,
        guest_team,
        end_score: format!("{}:{}", scores[0], scores[1]),
        halftime_score: format!("{}:{}", scores[2], scores[3]),
    };

    let grade = parse_grade(&cell_text(row, &GRADE_CELL));
    let scp = cell_text(row, &SCP_CELL).parse().unwrap_or(0);
    let sub_in = parse_minute(&cell_text(row, &SUB_IN_CELL)).unwrap_or(0);
    // an unparseable sub-out cell means the player finished the match
    let sub_out = parse_minute(&cell_text(row, &SUB_OUT_CELL)).unwrap_or(FULL_MATCH_MINUTES);
    let playtime = sub_out.saturating_sub(sub_in);
    let conceded = conceded_goals(team, &game, playtime);

    let record = MatchRecord {
        game,
        grade,
        scp,
        playtime,
        sub_in,
        sub_out,
        top11: false,
        conceded_goals: conceded,
    };
    Ok((matchday, record))
}

/// Goals the player's team let in while the player was on the pitch, scaled
/// linearly by the fraction of the match played. A team slug matching
/// neither side yields the unattributable marker.
pub fn conceded_goals(team: &str, game: &Match, playtime: u32) -> f64 {
    let Some((home_goals, guest_goals)) = parse_score(&game.end_score) else {
        return CONCEDED_UNATTRIBUTABLE;
    };
    let share = playtime as f64 / FULL_MATCH_MINUTES as f64;
    if team == game.home_team {
        guest_goals as f64 * share
    } else if team == game.guest_team {
        home_goals as f64 * share
    } else {
        CONCEDED_UNATTRIBUTABLE
    }
}

fn parse_score(score: &str) -> Option<(u32, u32)> {
    let (home, guest) = score.split_once(':')?;
    Some((home.trim().parse().ok()?, guest.trim().parse().ok()?))
}

// The matchday info cell reads like "4. Spieltag 24.10.2020"; the number
// ahead of the first period keys the record, so it is the one field whose
// parse failure drops the row.
fn parse_matchday(info: &str) -> Result<u32> {
    let lead = info.split('.').next().unwrap_or_default().trim();
    lead.parse::<u32>()
        .with_context(|| format!("matchday cell {info:?} has no leading number"))
}

/// Grades are printed with a decimal comma ("2,5").
fn parse_grade(raw: &str) -> f64 {
    raw.replace(',', ".").parse().unwrap_or(GRADE_UNRATED)
}

/// Minute cells carry period punctuation ("46."); strip it before parsing.
fn parse_minute(raw: &str) -> Option<u32> {
    let cleaned = raw.replace('.', "");
    cleaned.trim().parse().ok()
}

fn team_slug(link: ElementRef) -> Option<String> {
    let href = link.value().attr("href")?;
    href.split('/').nth(1).map(|slug| slug.to_string())
}

fn cell_text(row: ElementRef, selector: &Selector) -> String {
    row.select(selector).next().map(element_text).unwrap_or_default()
}

fn element_text(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}
