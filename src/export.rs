use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::stats::{CSV_HEADER, PlayerMatchRow};

pub const DATA_DIR: &str = "data";

pub fn table_csv_path(dir: &Path, table_id: &str) -> PathBuf {
    dir.join(format!("{table_id}.csv"))
}

/// Write one table's rows. The file lands via tmp + rename so an interrupted
/// run never leaves a half-written file that would be mistaken for a finished
/// table on the next pass.
pub fn write_table_csv(dir: &Path, table_id: &str, rows: &[PlayerMatchRow]) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("failed creating {}", dir.display()))?;

    let path = table_csv_path(dir, table_id);
    let tmp = path.with_extension("csv.tmp");

    let mut writer = csv::Writer::from_path(&tmp)
        .with_context(|| format!("failed opening {}", tmp.display()))?;
    writer
        .write_record(CSV_HEADER)
        .context("failed writing csv header")?;
    for row in rows {
        writer
            .write_record(row.csv_record())
            .with_context(|| format!("failed writing row for table {table_id}"))?;
    }
    writer.flush().context("failed flushing csv")?;
    drop(writer);

    fs::rename(&tmp, &path)
        .with_context(|| format!("failed moving {} into place", tmp.display()))?;
    Ok(())
}
