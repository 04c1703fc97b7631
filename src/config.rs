use std::env;

/// Fixed season and competition parameters for one crawl run. The label must
/// equal the text of the selected season option on the statistics page, the
/// path is the matching URL segment.
#[derive(Debug, Clone)]
pub struct SeasonConfig {
    pub season_label: String,
    pub season_path: String,
    pub competition: String,
    pub matchday_marker: String,
    pub matchdays: u32,
}

impl SeasonConfig {
    pub fn defaults() -> Self {
        Self {
            season_label: "2020/21".to_string(),
            season_path: "2020-21".to_string(),
            competition: "Bundesliga".to_string(),
            matchday_marker: "Spieltag".to_string(),
            matchdays: 34,
        }
    }

    /// Defaults with env overrides (SEASON_LABEL, SEASON_PATH, MATCHDAY_COUNT).
    pub fn from_env() -> Self {
        let mut cfg = Self::defaults();
        if let Some(label) = non_empty_var("SEASON_LABEL") {
            cfg.season_label = label;
        }
        if let Some(path) = non_empty_var("SEASON_PATH") {
            cfg.season_path = path;
        }
        if let Some(count) = non_empty_var("MATCHDAY_COUNT").and_then(|val| val.parse::<u32>().ok())
        {
            cfg.matchdays = count.clamp(1, 99);
        }
        cfg
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    let val = env::var(name).ok()?;
    let trimmed = val.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}
