use std::path::{Path, PathBuf};

use anyhow::Result;

use kicker_scout::aggregate;
use kicker_scout::config::SeasonConfig;
use kicker_scout::export;
use kicker_scout::roster;
use kicker_scout::stats_fetch;
use kicker_scout::top_eleven_fetch;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env");
    env_logger::init();

    let roster_path = parse_roster_path_arg().unwrap_or_else(|| PathBuf::from("players.json"));
    let cfg = SeasonConfig::from_env();

    let mut players = roster::load_roster(&roster_path)?;

    let stats = stats_fetch::fetch_player_stats(&mut players, &cfg);
    let top_eleven = top_eleven_fetch::fetch_top_eleven(&cfg);
    top_eleven_fetch::merge_top_eleven(&mut players, &top_eleven.selections);
    aggregate::compute_averages(&mut players);

    export::write_player_data(Path::new("playerdata.json"), &players)?;
    export::write_player_csv(Path::new("playerdata.csv"), &players, &cfg)?;

    let records: usize = players.iter().map(|p| p.matches.len()).sum();
    println!("Crawl complete");
    println!("Season: {}", cfg.season_label);
    println!("Players: {} ({records} match records)", players.len());
    println!(
        "Team of the day entries: {}",
        top_eleven.selections.values().map(Vec::len).sum::<usize>()
    );

    for err in stats.errors.iter().chain(&top_eleven.errors) {
        eprintln!("warning: {err}");
    }

    Ok(())
}

fn parse_roster_path_arg() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--roster" {
            return args.next().map(PathBuf::from);
        }
        if let Some(rest) = arg.strip_prefix("--roster=") {
            return Some(PathBuf::from(rest));
        }
    }
    None
}
