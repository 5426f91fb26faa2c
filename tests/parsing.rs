use std::fs;
use std::path::PathBuf;

use serde_json::json;

use bga_scrape::fetch::{parse_games_page, parse_table_stats};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_games_page_fixture() {
    let raw = read_fixture("games_page.json");
    let tables = parse_games_page(&raw).expect("fixture should parse");
    assert_eq!(tables.len(), 2);

    assert_eq!(tables[0].table_id, "612345678");
    assert_eq!(tables[0].start, json!("1754000000"));
    assert_eq!(tables[0].end, json!("1754002410"));

    // Numeric ids and timestamps pass through too.
    assert_eq!(tables[1].table_id, "612345999");
    assert_eq!(tables[1].start, json!(1754010000));
}

#[test]
fn empty_games_page_parses_to_no_tables() {
    let raw = read_fixture("games_page_empty.json");
    let tables = parse_games_page(&raw).expect("fixture should parse");
    assert!(tables.is_empty());
}

#[test]
fn games_page_without_data_is_an_error() {
    assert!(parse_games_page(r#"{"status":0,"error":"not logged in"}"#).is_err());
    assert!(parse_games_page("null").is_err());
    assert!(parse_games_page("").is_err());
}

#[test]
fn games_page_rows_without_table_id_are_dropped() {
    let raw = r#"{"data":{"tables":[{"start":"1","end":"2"},{"table_id":"77","start":"3","end":"4"}]}}"#;
    let tables = parse_games_page(raw).expect("should parse");
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].table_id, "77");
}

#[test]
fn parses_table_stats_fixture() {
    let raw = read_fixture("table_stats.json");
    let stats = parse_table_stats(&raw).expect("fixture should parse");

    assert_eq!(stats.players.len(), 2);
    assert_eq!(stats.players[0].id, "86134312");
    assert_eq!(stats.players[0].name, Some(json!("Alcibiades")));
    assert_eq!(stats.players[1].elo_won, Some(json!("-14")));

    assert_eq!(stats.scores.civilian.len(), 2);
    assert_eq!(stats.scores.civilian.get("90871234"), Some(&json!("21")));
    assert_eq!(stats.scores.wonder_id.get("86134312"), Some(&json!("3")));

    // The second player has no guild entry in the fixture.
    assert_eq!(stats.scores.guild.len(), 1);
    assert!(!stats.scores.guild.contains_key("90871234"));
}

#[test]
fn unscored_table_stats_have_empty_civilian_map() {
    let raw = read_fixture("table_stats_unscored.json");
    let stats = parse_table_stats(&raw).expect("fixture should parse");
    assert_eq!(stats.players.len(), 1);
    assert!(stats.scores.civilian.is_empty());
    assert!(!stats.scores.wonder_id.is_empty());
}

#[test]
fn table_stats_without_data_is_an_error() {
    assert!(parse_table_stats(r#"{"status":0}"#).is_err());
    assert!(parse_table_stats("null").is_err());
}

#[test]
fn table_stats_without_result_parse_to_nothing() {
    let stats = parse_table_stats(r#"{"data":{}}"#).expect("should parse");
    assert!(stats.players.is_empty());
    assert!(stats.scores.civilian.is_empty());
}
