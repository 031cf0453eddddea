pub mod calculate;
pub mod login;
pub mod reveal;
pub mod schema;
pub mod tickers;
pub mod trades;

use crate::basis::{self, TransactionRow};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Read activity rows from a CSV file (or stdin with "-")
pub fn read_rows(path: &Path) -> anyhow::Result<Vec<TransactionRow>> {
    if path.as_os_str() == "-" {
        read_from_stdin()
    } else {
        let file = File::open(path)
            .map_err(|e| anyhow::anyhow!("failed to open {}: {}", path.display(), e))?;
        basis::read_csv(BufReader::new(file))
    }
}

fn read_from_stdin() -> anyhow::Result<Vec<TransactionRow>> {
    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin.lock());

    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;

    if buffer.is_empty() {
        anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
    }

    basis::read_csv(io::Cursor::new(buffer))
}
