//! Import command helpers

mod csv;
pub use self::csv::*;

use rake_core::prelude::GenericError;
use rake_pragmatic::format::snapshot::Snapshot;
use std::io::{BufReader, Read};

/// Imports snapshot skeleton from specific format into pragmatic.
pub fn import_snapshot<R: Read>(
    input_format: &str,
    readers: Option<Vec<BufReader<R>>>,
) -> Result<Snapshot, GenericError> {
    match (input_format, readers) {
        ("csv", Some(mut readers)) if readers.len() == 2 => {
            let orders = readers.swap_remove(0);
            let wagons = readers.swap_remove(0);
            read_csv_snapshot(orders, wagons).map_err(|err| format!("cannot read csv: {err}").into())
        }
        ("csv", _) => Err("csv format expects two files with orders and wagons as an input".into()),
        _ => Err(format!("unknown format: '{input_format}'").into()),
    }
}
