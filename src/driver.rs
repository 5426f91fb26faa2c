use std::path::PathBuf;

use anyhow::Result;
use reqwest::blocking::Client;

use crate::export;
use crate::fetch::{self, PageFetch, TableSummary};
use crate::session::SessionCredentials;
use crate::stats::{PlayerMatchRow, TableStats, project_rows};

/// Where listing pages and table statistics come from. The live source talks
/// to the site; tests plug in canned pages.
pub trait TableSource {
    fn games_page(&mut self, page: u32) -> PageFetch;
    fn table_stats(&mut self, summary: &TableSummary) -> Result<TableStats>;
}

/// Where finished tables land. `contains` doubles as the already-scraped
/// check, so a stored table is never fetched again.
pub trait TableStore {
    fn contains(&self, table_id: &str) -> bool;
    fn store(&mut self, table_id: &str, rows: &[PlayerMatchRow]) -> Result<()>;
}

pub struct LiveSource<'a> {
    client: &'a Client,
    creds: SessionCredentials,
}

impl<'a> LiveSource<'a> {
    pub fn new(client: &'a Client, creds: SessionCredentials) -> Self {
        Self { client, creds }
    }
}

impl TableSource for LiveSource<'_> {
    fn games_page(&mut self, page: u32) -> PageFetch {
        fetch::fetch_games_page(self.client, &self.creds, page)
    }

    fn table_stats(&mut self, summary: &TableSummary) -> Result<TableStats> {
        fetch::fetch_table_stats(self.client, &self.creds, &summary.table_id)
    }
}

/// One CSV file per table under a fixed directory; file presence marks the
/// table done.
pub struct CsvStore {
    dir: PathBuf,
}

impl CsvStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl TableStore for CsvStore {
    fn contains(&self, table_id: &str) -> bool {
        export::table_csv_path(&self.dir, table_id).exists()
    }

    fn store(&mut self, table_id: &str, rows: &[PlayerMatchRow]) -> Result<()> {
        export::write_table_csv(&self.dir, table_id, rows)
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub pages: u32,
    pub tables_seen: usize,
    pub written: usize,
    pub skipped_existing: usize,
    pub skipped_failed: usize,
    pub unscored: usize,
}

/// Walk the match history page by page until a page comes back empty or
/// fails, fetching and storing statistics for every table not already on
/// disk.
pub fn run_scrape(source: &mut impl TableSource, store: &mut impl TableStore) -> Result<RunSummary> {
    let mut summary = RunSummary::default();
    let mut page = fetch::FIRST_PAGE;

    loop {
        println!("[INFO] fetching games page {page}");
        summary.pages += 1;

        let tables = match source.games_page(page) {
            PageFetch::Tables(tables) => tables,
            PageFetch::Empty => {
                println!("[INFO] page {page} has no games, done");
                break;
            }
            PageFetch::Failed(reason) => {
                // Terminates the walk exactly like an empty page; the warning
                // is the only trace that the history may be truncated.
                println!("[WARN] page {page} failed ({reason}), stopping here");
                break;
            }
        };

        for table in &tables {
            summary.tables_seen += 1;
            if store.contains(&table.table_id) {
                summary.skipped_existing += 1;
                continue;
            }

            println!("[INFO] fetching stats for table {}", table.table_id);
            let stats = match source.table_stats(table) {
                Ok(stats) => stats,
                Err(err) => {
                    println!("[WARN] skipping table {}: {err:#}", table.table_id);
                    summary.skipped_failed += 1;
                    continue;
                }
            };

            let rows = project_rows(table, &stats);
            if rows.is_empty() {
                // No civilian scores recorded. Nothing is written, so the
                // table stays eligible on every future run.
                println!("[INFO] table {} has no scores, not writing", table.table_id);
                summary.unscored += 1;
                continue;
            }

            store.store(&table.table_id, &rows)?;
            summary.written += 1;
        }

        page += 1;
    }

    Ok(summary)
}
