use std::collections::HashMap;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use rayon::prelude::*;
use reqwest::blocking::Client;
use scraper::{Html, Selector};

use crate::config::SeasonConfig;
use crate::http_client::{fetch_html, http_client, with_fetch_pool};
use crate::roster::Player;

const KICKER_BASE: &str = "https://www.kicker.de";

static LINEUP_CARD: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.kick__lineup-player-card").expect("selector parses"));

pub struct TopElevenFetch {
    /// Matchdays on which a player slug made the team of the day.
    pub selections: HashMap<String, Vec<u32>>,
    pub errors: Vec<String>,
}

/// One page per matchday, crawled concurrently on the shared pool. Every
/// task returns its own slug list; the lists are folded into the map only
/// after all tasks have settled, so no shared state is written while the
/// crawl is in flight.
pub fn fetch_top_eleven(cfg: &SeasonConfig) -> TopElevenFetch {
    let client = match http_client() {
        Ok(client) => client,
        Err(err) => {
            return TopElevenFetch {
                selections: HashMap::new(),
                errors: vec![format!("top eleven client build failed: {err}")],
            };
        }
    };

    let results: Vec<(u32, Vec<String>, Option<String>)> = with_fetch_pool(|| {
        (1..=cfg.matchdays)
            .into_par_iter()
            .map(|matchday| match scrape_matchday(client, matchday, cfg) {
                Ok(slugs) => (matchday, slugs, None),
                Err(err) => (
                    matchday,
                    Vec::new(),
                    Some(format!("matchday {matchday}: {err}")),
                ),
            })
            .collect()
    });

    let mut selections: HashMap<String, Vec<u32>> = HashMap::new();
    let mut errors = Vec::new();
    for (matchday, slugs, err) in results {
        if let Some(err) = err {
            errors.push(err);
        }
        for slug in slugs {
            selections.entry(slug).or_default().push(matchday);
        }
    }

    TopElevenFetch { selections, errors }
}

fn scrape_matchday(client: &Client, matchday: u32, cfg: &SeasonConfig) -> Result<Vec<String>> {
    let url = top_eleven_url(matchday, cfg);
    log::info!("visiting {url}");
    let html = fetch_html(client, &url).context("team of the day page fetch failed")?;
    Ok(parse_top_eleven_page(&html))
}

pub fn top_eleven_url(matchday: u32, cfg: &SeasonConfig) -> String {
    format!(
        "{KICKER_BASE}/bundesliga/elf-des-tages/{}/{matchday}",
        cfg.season_path
    )
}

/// Player slugs named to the team of the day, one entry per lineup card.
/// A player carded twice on one page stays listed twice; the caller
/// accumulates instead of replacing.
pub fn parse_top_eleven_page(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    doc.select(&LINEUP_CARD)
        .filter_map(|card| card.value().attr("href"))
        .filter_map(|href| href.split('/').nth(1))
        .map(|slug| slug.to_string())
        .collect()
}

/// Stamp the all-star flag onto the records collected by the player crawl.
/// A listing for a matchday without a record means the two crawls disagree;
/// it is logged and skipped.
pub fn merge_top_eleven(players: &mut [Player], selections: &HashMap<String, Vec<u32>>) {
    for player in players.iter_mut() {
        let Some(matchdays) = selections.get(&player.kicker_name) else {
            continue;
        };
        for matchday in matchdays {
            match player.matches.get_mut(matchday) {
                Some(record) => record.top11 = true,
                None => log::warn!(
                    "{} listed in team of the day for matchday {matchday} but has no match record",
                    player.name
                ),
            }
        }
    }
}
