use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use kicker_scout::config::SeasonConfig;
use kicker_scout::roster::Player;
use kicker_scout::stats_fetch::parse_player_page;
use kicker_scout::top_eleven_fetch::parse_top_eleven_page;

const PLAYER_PAGE: &str = include_str!("../tests/fixtures/player_page.html");
const TOP_ELEVEN_PAGE: &str = include_str!("../tests/fixtures/top_eleven.html");

fn bench_player_page_parse(c: &mut Criterion) {
    let cfg = SeasonConfig::defaults();
    let player = Player {
        name: "Manuel Neuer".to_string(),
        kicker_name: "manuel-neuer".to_string(),
        kicker_team: "fc-bayern-muenchen".to_string(),
        ..Player::default()
    };
    c.bench_function("player_page_parse", |b| {
        b.iter(|| {
            let records = parse_player_page(black_box(PLAYER_PAGE), &player, &cfg).unwrap();
            black_box(records.len());
        })
    });
}

fn bench_top_eleven_parse(c: &mut Criterion) {
    c.bench_function("top_eleven_parse", |b| {
        b.iter(|| {
            let slugs = parse_top_eleven_page(black_box(TOP_ELEVEN_PAGE));
            black_box(slugs.len());
        })
    });
}

criterion_group!(benches, bench_player_page_parse, bench_top_eleven_parse);
criterion_main!(benches);
