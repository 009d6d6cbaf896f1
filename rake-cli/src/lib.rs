//! A command line interface library of the rake formation engine.
//!
//! It keeps helpers used by `rake-cli` binary: planning configuration in json format,
//! graceful interruption on Ctrl-C, import of csv exports and plan feasibility check.

#![warn(missing_docs)]

#[cfg(test)]
#[path = "../tests/helpers/mod.rs"]
#[macro_use]
pub mod helpers;

pub use rake_core as core;
pub use rake_pragmatic as pragmatic;

pub mod extensions;

use rake_pragmatic::format::MultiFormatError;

/// Returns serialized into json list of format errors.
pub fn get_errors_serialized(errors: &MultiFormatError) -> String {
    errors.to_json()
}
