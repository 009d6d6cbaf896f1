//! Specifies logic to read a planning snapshot from json input.

#[cfg(test)]
#[path = "../../../tests/unit/format/snapshot/reader_test.rs"]
mod reader_test;

use super::{FormatError, MultiFormatError};
use rake_core::prelude::WorldState;
use std::io::{BufReader, Read};

mod model;
pub use self::model::*;

mod reader;
use self::reader::map_to_world;

/// Reads snapshot definition from various sources.
pub trait PragmaticSnapshot {
    /// Reads snapshot defined in pragmatic format.
    fn read_pragmatic(self) -> Result<WorldState, MultiFormatError>;
}

impl<R: Read> PragmaticSnapshot for BufReader<R> {
    fn read_pragmatic(self) -> Result<WorldState, MultiFormatError> {
        deserialize_snapshot(self)?.read_pragmatic()
    }
}

impl PragmaticSnapshot for String {
    fn read_pragmatic(self) -> Result<WorldState, MultiFormatError> {
        BufReader::new(self.as_bytes()).read_pragmatic()
    }
}

impl PragmaticSnapshot for Snapshot {
    fn read_pragmatic(self) -> Result<WorldState, MultiFormatError> {
        map_to_world(&self)
    }
}
