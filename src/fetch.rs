use std::collections::HashMap;

use anyhow::{Context, Result, anyhow};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::session::{SITE_ROOT, SessionCredentials};
use crate::stats::{PlayerEntry, ScoreTables, TableStats};

pub const GAME_ID: u32 = 1131;
pub const FIRST_PAGE: u32 = 1;

const GAMES_PATH: &str = "/gamestats/gamestats/getGames.html";
const TABLE_INFOS_PATH: &str = "/table/table/tableinfos.html";

/// One finished game from the listing. Start and end are carried through to
/// the CSV untouched, so they stay raw JSON values.
#[derive(Debug, Clone)]
pub struct TableSummary {
    pub table_id: String,
    pub start: Value,
    pub end: Value,
}

/// Outcome of one listing-page fetch. The driver stops on both `Empty` and
/// `Failed`; keeping them apart means a truncated scrape at least leaves a
/// warning behind.
#[derive(Debug)]
pub enum PageFetch {
    Tables(Vec<TableSummary>),
    Empty,
    Failed(String),
}

pub fn fetch_games_page(client: &Client, creds: &SessionCredentials, page: u32) -> PageFetch {
    let raw = match request_games_page(client, creds, page) {
        Ok(raw) => raw,
        Err(err) => return PageFetch::Failed(format!("{err:#}")),
    };
    match parse_games_page(&raw) {
        Ok(tables) if tables.is_empty() => PageFetch::Empty,
        Ok(tables) => PageFetch::Tables(tables),
        Err(err) => PageFetch::Failed(format!("{err:#}")),
    }
}

fn request_games_page(client: &Client, creds: &SessionCredentials, page: u32) -> Result<String> {
    let referer = format!(
        "{SITE_ROOT}/gamestats?player={}&game_id={GAME_ID}",
        creds.player_id
    );
    let resp = client
        .get(format!("{SITE_ROOT}{GAMES_PATH}"))
        .query(&[
            ("player", creds.player_id.clone()),
            ("opponent_id", "0".to_string()),
            ("game_id", GAME_ID.to_string()),
            ("finished", "0".to_string()),
            ("page", page.to_string()),
            ("updateStats", "0".to_string()),
        ])
        .header("accept", "*/*")
        .header(
            "x-request-token",
            creds.request_token.as_deref().unwrap_or_default(),
        )
        .header("x-requested-with", "XMLHttpRequest")
        .header("cookie", &creds.cookie_header)
        .header("referer", referer)
        .send()
        .context("games request failed")?;

    let status = resp.status();
    let body = resp.text().context("failed reading games body")?;
    if !status.is_success() {
        return Err(anyhow!("http {status} fetching games page {page}"));
    }
    Ok(body)
}

#[derive(Debug, Deserialize)]
struct GamesResponse {
    data: Option<GamesData>,
}

#[derive(Debug, Deserialize)]
struct GamesData {
    #[serde(default)]
    tables: Vec<Value>,
}

pub fn parse_games_page(raw: &str) -> Result<Vec<TableSummary>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(anyhow!("empty games response"));
    }
    let parsed: GamesResponse = serde_json::from_str(trimmed).context("invalid games json")?;
    let Some(data) = parsed.data else {
        return Err(anyhow!("games response missing data"));
    };

    let mut tables = Vec::with_capacity(data.tables.len());
    for entry in data.tables {
        let Some(table_id) = entry.get("table_id").and_then(as_id_string) else {
            continue;
        };
        let start = entry.get("start").cloned().unwrap_or(Value::Null);
        let end = entry.get("end").cloned().unwrap_or(Value::Null);
        tables.push(TableSummary {
            table_id,
            start,
            end,
        });
    }
    Ok(tables)
}

pub fn fetch_table_stats(
    client: &Client,
    creds: &SessionCredentials,
    table_id: &str,
) -> Result<TableStats> {
    // content-type is pinned before .form() so the charset-qualified value
    // the site expects is the one that goes out.
    let resp = client
        .post(format!("{SITE_ROOT}{TABLE_INFOS_PATH}"))
        .header(
            "content-type",
            "application/x-www-form-urlencoded;charset=UTF-8",
        )
        .form(&[("id", table_id)])
        .header("accept", "*/*")
        .header(
            "x-request-token",
            creds.request_token.as_deref().unwrap_or_default(),
        )
        .header("cookie", &creds.cookie_header)
        .header("referer", format!("{SITE_ROOT}/table?table={table_id}"))
        .send()
        .context("table infos request failed")?;

    let status = resp.status();
    let body = resp.text().context("failed reading table infos body")?;
    if !status.is_success() {
        return Err(anyhow!("http {status} fetching table {table_id}"));
    }
    parse_table_stats(&body)
}

pub fn parse_table_stats(raw: &str) -> Result<TableStats> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(anyhow!("empty table infos response"));
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid table infos json")?;
    let Some(data) = root.get("data") else {
        return Err(anyhow!("table infos response missing data"));
    };

    // A payload without `result` still parses; it just projects to nothing.
    let result = data.get("result").unwrap_or(&Value::Null);
    let players = parse_players(result.get("player"));
    let scores = parse_score_tables(result.get("stats").and_then(|v| v.get("player")));
    Ok(TableStats { players, scores })
}

fn parse_players(value: Option<&Value>) -> Vec<PlayerEntry> {
    let mut out = Vec::new();
    let Some(list) = value.and_then(|v| v.as_array()) else {
        return out;
    };
    for entry in list {
        let Some(id) = entry.get("player_id").and_then(as_id_string) else {
            continue;
        };
        out.push(PlayerEntry {
            id,
            name: entry.get("name").cloned(),
            rank: entry.get("gamerank").cloned(),
            score: entry.get("score").cloned(),
            elo_won: entry.get("point_win").cloned(),
            elo_after: entry.get("rank_after_game").cloned(),
        });
    }
    out
}

fn parse_score_tables(stats: Option<&Value>) -> ScoreTables {
    ScoreTables {
        wonder_id: stat_values(stats, "wonder_id"),
        civilian: stat_values(stats, "points_civilian"),
        science: stat_values(stats, "points_science"),
        commerce: stat_values(stats, "points_commerce"),
        guild: stat_values(stats, "points_guild"),
        treasure: stat_values(stats, "points_treasure"),
        wonder: stat_values(stats, "points_wonder"),
        victory: stat_values(stats, "points_victory"),
        defeat: stat_values(stats, "points_defeat"),
        reflexion_time: stat_values(stats, "reflexion_time"),
    }
}

fn stat_values(stats: Option<&Value>, name: &str) -> HashMap<String, Value> {
    let mut out = HashMap::new();
    let Some(values) = stats
        .and_then(|v| v.get(name))
        .and_then(|v| v.get("values"))
        .and_then(|v| v.as_object())
    else {
        return out;
    };
    for (player_id, value) in values {
        out.insert(player_id.clone(), value.clone());
    }
    out
}

// Table and player ids arrive as strings in practice, but the api is not
// consistent about it across endpoints.
fn as_id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
