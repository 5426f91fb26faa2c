use std::collections::HashMap;

use serde_json::Value;

use crate::fetch::TableSummary;

pub const CSV_HEADER: [&str; 17] = [
    "Table ID",
    "Player Name",
    "Rank",
    "Score",
    "Wonder ID",
    "VP - Civilian",
    "VP - Science",
    "VP - Commerce",
    "VP - Guild",
    "VP - Coins",
    "VP - Wonder",
    "VP - Military (Victory)",
    "VP - Military (Defeat)",
    "ELO Won",
    "ELO After",
    "Start",
    "End",
];

/// Per-table statistics as returned by the table-infos endpoint, reduced to
/// the parts the projection reads.
#[derive(Debug, Clone, Default)]
pub struct TableStats {
    pub players: Vec<PlayerEntry>,
    pub scores: ScoreTables,
}

/// One entry of `data.result.player`. Fields other than the id are kept as
/// raw JSON values; missing keys stay `None`.
#[derive(Debug, Clone)]
pub struct PlayerEntry {
    pub id: String,
    pub name: Option<Value>,
    pub rank: Option<Value>,
    pub score: Option<Value>,
    pub elo_won: Option<Value>,
    pub elo_after: Option<Value>,
}

/// The per-player value maps under `data.result.stats.player`, one map per
/// statistic, keyed by player id string. A statistic missing from the payload
/// becomes an empty map.
#[derive(Debug, Clone, Default)]
pub struct ScoreTables {
    pub wonder_id: HashMap<String, Value>,
    pub civilian: HashMap<String, Value>,
    pub science: HashMap<String, Value>,
    pub commerce: HashMap<String, Value>,
    pub guild: HashMap<String, Value>,
    pub treasure: HashMap<String, Value>,
    pub wonder: HashMap<String, Value>,
    pub victory: HashMap<String, Value>,
    pub defeat: HashMap<String, Value>,
    pub reflexion_time: HashMap<String, Value>,
}

/// One CSV data row: one player in one table. Fields are already rendered to
/// their on-disk text; an absent value is the empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerMatchRow {
    pub table_id: String,
    pub player_name: String,
    pub rank: String,
    pub score: String,
    pub wonder_id: String,
    pub vp_civilian: String,
    pub vp_science: String,
    pub vp_commerce: String,
    pub vp_guild: String,
    pub vp_coins: String,
    pub vp_wonder: String,
    pub vp_victory: String,
    pub vp_defeat: String,
    pub elo_won: String,
    pub elo_after: String,
    pub start: String,
    pub end: String,
}

impl PlayerMatchRow {
    pub fn csv_record(&self) -> [&str; 17] {
        [
            &self.table_id,
            &self.player_name,
            &self.rank,
            &self.score,
            &self.wonder_id,
            &self.vp_civilian,
            &self.vp_science,
            &self.vp_commerce,
            &self.vp_guild,
            &self.vp_coins,
            &self.vp_wonder,
            &self.vp_victory,
            &self.vp_defeat,
            &self.elo_won,
            &self.elo_after,
            &self.start,
            &self.end,
        ]
    }
}

/// Flatten a table's statistics into one row per player.
///
/// Tables with an empty civilian-points map yield no rows at all, even when
/// other statistics are present; such tables are left unwritten and picked up
/// again on the next run.
pub fn project_rows(summary: &TableSummary, stats: &TableStats) -> Vec<PlayerMatchRow> {
    if stats.scores.civilian.is_empty() {
        return Vec::new();
    }

    let mut rows = Vec::with_capacity(stats.players.len());
    for player in &stats.players {
        let pick = |table: &HashMap<String, Value>| field_text(table.get(&player.id));
        rows.push(PlayerMatchRow {
            table_id: summary.table_id.clone(),
            player_name: field_text(player.name.as_ref()),
            rank: field_text(player.rank.as_ref()),
            score: field_text(player.score.as_ref()),
            wonder_id: pick(&stats.scores.wonder_id),
            vp_civilian: pick(&stats.scores.civilian),
            vp_science: pick(&stats.scores.science),
            vp_commerce: pick(&stats.scores.commerce),
            vp_guild: pick(&stats.scores.guild),
            vp_coins: pick(&stats.scores.treasure),
            vp_wonder: pick(&stats.scores.wonder),
            vp_victory: pick(&stats.scores.victory),
            vp_defeat: pick(&stats.scores.defeat),
            elo_won: field_text(player.elo_won.as_ref()),
            elo_after: field_text(player.elo_after.as_ref()),
            start: field_text(Some(&summary.start)),
            end: field_text(Some(&summary.end)),
        });
    }
    rows
}

fn field_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
