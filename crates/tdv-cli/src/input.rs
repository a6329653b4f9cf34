//! Record input for the view commands.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use tdv_model::Record;
use tdv_screens::Screen;

/// Records for `screen`: the bundled sample data, or a JSON array read from
/// `path` (`-` reads stdin).
pub fn load_records(screen: Screen, path: Option<&Path>) -> Result<Vec<Record>> {
    let Some(path) = path else {
        let records = screen
            .sample_records()
            .with_context(|| format!("load sample data for {screen}"))?;
        info!(screen = %screen, records = records.len(), "using sample data");
        return Ok(records);
    };

    let json = if path == Path::new("-") {
        let mut json = String::new();
        io::stdin()
            .read_to_string(&mut json)
            .context("read records from stdin")?;
        json
    } else {
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?
    };
    let records = screen
        .parse_records(&json)
        .with_context(|| format!("parse records from {}", path.display()))?;
    info!(screen = %screen, path = %path.display(), records = records.len(), "loaded records");
    Ok(records)
}
