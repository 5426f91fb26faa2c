use anyhow::Result;

use bga_scrape::driver::{CsvStore, LiveSource, run_scrape};
use bga_scrape::export::DATA_DIR;
use bga_scrape::http_client::http_client;
use bga_scrape::session::{ConsoleLogin, CredentialProvider};

fn main() -> Result<()> {
    let client = http_client()?;
    let creds = ConsoleLogin.obtain(client)?;
    println!("[INFO] logged in as player {}", creds.player_id);

    let mut source = LiveSource::new(client, creds);
    let mut store = CsvStore::new(DATA_DIR);
    let summary = run_scrape(&mut source, &mut store)?;

    println!("Scrape complete");
    println!("Pages fetched: {}", summary.pages);
    println!("Tables seen: {}", summary.tables_seen);
    println!("Written: {}", summary.written);
    println!("Already saved: {}", summary.skipped_existing);
    println!("Fetch failed: {}", summary.skipped_failed);
    println!("No scores recorded: {}", summary.unscored);

    Ok(())
}
