use std::fs;
use std::path::PathBuf;

use kicker_scout::config::SeasonConfig;
use kicker_scout::roster::{CONCEDED_UNATTRIBUTABLE, GRADE_UNRATED, Player};
use kicker_scout::stats_fetch::parse_player_page;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn bayern_keeper() -> Player {
    Player {
        name: "Manuel Neuer".to_string(),
        team: "FC Bayern".to_string(),
        position: "Torwart".to_string(),
        kicker_name: "manuel-neuer".to_string(),
        kicker_team: "fc-bayern-muenchen".to_string(),
        ..Player::default()
    }
}

#[test]
fn collects_competition_rows_only() {
    let html = read_fixture("player_page.html");
    let records = parse_player_page(&html, &bayern_keeper(), &SeasonConfig::defaults())
        .expect("fixture should parse");

    // Champions League rows ahead of the section and everything past the
    // Relegation header stay out; the no-squad matchday yields no record.
    let matchdays: Vec<u32> = records.keys().copied().collect();
    assert_eq!(matchdays, vec![2, 4, 5]);
}

#[test]
fn extracts_fields_from_a_full_row() {
    let html = read_fixture("player_page.html");
    let records = parse_player_page(&html, &bayern_keeper(), &SeasonConfig::defaults())
        .expect("fixture should parse");

    let record = &records[&2];
    assert_eq!(record.game.home_team, "fc-bayern-muenchen");
    assert_eq!(record.game.guest_team, "borussia-dortmund");
    assert_eq!(record.game.end_score, "2:1");
    assert_eq!(record.game.halftime_score, "1:0");
    assert_eq!(record.grade, 2.5);
    assert_eq!(record.scp, 3);
    assert_eq!(record.sub_in, 46);
    assert_eq!(record.sub_out, 90);
    assert_eq!(record.playtime, 44);
    assert!(!record.top11);
    // home side, so Dortmund's goal counts, scaled by minutes played
    assert!((record.conceded_goals - 44.0 / 90.0).abs() < 1e-9);
}

#[test]
fn missing_cells_degrade_to_fallbacks() {
    let html = read_fixture("player_page.html");
    let records = parse_player_page(&html, &bayern_keeper(), &SeasonConfig::defaults())
        .expect("fixture should parse");

    // Matchday 4 has empty grade/scp/substitution cells.
    let record = &records[&4];
    assert_eq!(record.grade, GRADE_UNRATED);
    assert_eq!(record.scp, 0);
    assert_eq!(record.sub_in, 0);
    assert_eq!(record.sub_out, 90);
    assert_eq!(record.playtime, 90);
    // guest side of an 0:3 away win concedes nothing
    assert_eq!(record.conceded_goals, 0.0);
}

#[test]
fn foreign_match_sides_yield_the_unattributable_marker() {
    let html = read_fixture("player_page.html");
    let records = parse_player_page(&html, &bayern_keeper(), &SeasonConfig::defaults())
        .expect("fixture should parse");

    assert_eq!(records[&5].conceded_goals, CONCEDED_UNATTRIBUTABLE);
}

#[test]
fn unparseable_sub_out_means_played_to_the_end() {
    let html = read_fixture("player_page.html");
    let records = parse_player_page(&html, &bayern_keeper(), &SeasonConfig::defaults())
        .expect("fixture should parse");

    // Matchday 5 has a sub-in of 31 and an empty sub-out cell.
    let record = &records[&5];
    assert_eq!(record.sub_in, 31);
    assert_eq!(record.sub_out, 90);
    assert_eq!(record.playtime, 59);
}

#[test]
fn first_extraction_wins_for_a_repeated_matchday() {
    let html = read_fixture("player_page.html");
    let records = parse_player_page(&html, &bayern_keeper(), &SeasonConfig::defaults())
        .expect("fixture should parse");

    // The fixture repeats matchday 2 with grade 5,0 further down the table.
    assert_eq!(records[&2].grade, 2.5);
}

#[test]
fn wrong_season_selection_yields_no_rows() {
    let html = read_fixture("player_page_wrong_season.html");
    let records = parse_player_page(&html, &bayern_keeper(), &SeasonConfig::defaults())
        .expect("fixture should parse");
    assert!(records.is_empty());
}

#[test]
fn missing_statistics_section_is_an_error() {
    let result = parse_player_page(
        "<html><body><p>404</p></body></html>",
        &bayern_keeper(),
        &SeasonConfig::defaults(),
    );
    assert!(result.is_err());
}
