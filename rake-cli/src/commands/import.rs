#[cfg(test)]
#[path = "../../tests/unit/commands/import_test.rs"]
mod import_test;

use super::*;
use clap::{Arg, Command};
use rake_cli::extensions::import::import_snapshot;
use rake_pragmatic::format::snapshot::serialize_snapshot;

const FORMAT_ARG_NAME: &str = "FORMAT";
const ORDERS_ARG_NAME: &str = "orders";
const WAGONS_ARG_NAME: &str = "wagons";
const OUT_RESULT_ARG_NAME: &str = "out-result";

pub fn get_import_app() -> Command {
    Command::new("import")
        .about("Provides the way to import snapshot skeleton from various formats")
        .arg(Arg::new(FORMAT_ARG_NAME).help("Specifies input type").required(true).value_parser(["csv"]).index(1))
        .arg(
            Arg::new(ORDERS_ARG_NAME)
                .help("Sets input file which contains order backlog")
                .long(ORDERS_ARG_NAME)
                .required(true),
        )
        .arg(
            Arg::new(WAGONS_ARG_NAME)
                .help("Sets input file which contains wagon pool")
                .long(WAGONS_ARG_NAME)
                .required(true),
        )
        .arg(
            Arg::new(OUT_RESULT_ARG_NAME)
                .help("Specifies path to file for result output")
                .short('o')
                .long(OUT_RESULT_ARG_NAME)
                .required(false),
        )
}

/// Runs import command.
pub fn run_import(matches: &ArgMatches) -> Result<(), String> {
    let input_format = matches.get_one::<String>(FORMAT_ARG_NAME).ok_or("input format is not specified")?;
    let input_files = [ORDERS_ARG_NAME, WAGONS_ARG_NAME]
        .iter()
        .filter_map(|&arg_name| matches.get_one::<String>(arg_name).map(|path| (arg_name, path)))
        .map(|(arg_name, path)| open_file(path, arg_name).map(BufReader::new))
        .collect::<Result<Vec<_>, _>>()?;

    let snapshot = import_snapshot(input_format, Some(input_files))
        .map_err(|err| format!("cannot import snapshot: '{err}'"))?;

    let out_result =
        matches.get_one::<String>(OUT_RESULT_ARG_NAME).map(|path| create_file(path, "out result")).transpose()?;
    let mut out_buffer = create_write_buffer(out_result);

    serialize_snapshot(&snapshot, &mut out_buffer)
        .and_then(|_| out_buffer.flush())
        .map_err(|err| format!("cannot serialize result snapshot: '{err}'"))
}
